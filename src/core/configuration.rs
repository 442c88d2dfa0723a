//! The configuration x platform matrix.
//!
//! The project descriptor needs a symmetric matrix of {Debug, Release} x
//! {Win32, x64}; only x64 is ever built, Win32 is carried because the
//! descriptor format expects every cell to be declared.

use std::fmt;
use std::str::FromStr;

/// Build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildConfiguration {
    #[default]
    Debug,
    Release,
}

impl BuildConfiguration {
    pub const ALL: [BuildConfiguration; 2] = [BuildConfiguration::Debug, BuildConfiguration::Release];

    /// Name as it appears in the descriptor and on the build-invoker command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "Debug",
            BuildConfiguration::Release => "Release",
        }
    }

    /// Output subdirectory name under the build directory.
    pub fn dir_name(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "debug",
            BuildConfiguration::Release => "release",
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, BuildConfiguration::Release)
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildConfiguration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildConfiguration::Debug),
            "release" => Ok(BuildConfiguration::Release),
            _ => Err(format!(
                "invalid build configuration '{}'; expected 'debug' or 'release'",
                s
            )),
        }
    }
}

/// Target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Win32,
    X64,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Win32, Platform::X64];

    /// The only platform the build-invoker is asked to build.
    pub const ACTIVE: Platform = Platform::X64;

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Win32 => "Win32",
            Platform::X64 => "x64",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configuration x platform pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixCell {
    pub configuration: BuildConfiguration,
    pub platform: Platform,
}

impl MatrixCell {
    pub fn new(configuration: BuildConfiguration, platform: Platform) -> Self {
        MatrixCell {
            configuration,
            platform,
        }
    }

    /// `Debug|x64` style key used in descriptor conditions and item names.
    pub fn key(&self) -> String {
        format!("{}|{}", self.configuration, self.platform)
    }

    /// MSBuild condition selecting this cell.
    pub fn condition(&self) -> String {
        format!("'$(Configuration)|$(Platform)'=='{}'", self.key())
    }

    pub fn compile_settings(&self) -> CompileSettings {
        CompileSettings::for_cell(*self)
    }

    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings::for_cell(*self)
    }
}

/// Every cell, configuration-major: Debug|Win32, Debug|x64, Release|Win32, Release|x64.
pub fn matrix() -> impl Iterator<Item = MatrixCell> {
    BuildConfiguration::ALL.into_iter().flat_map(|configuration| {
        Platform::ALL
            .into_iter()
            .map(move |platform| MatrixCell::new(configuration, platform))
    })
}

/// Preprocessor definitions for a configuration/platform name pair.
///
/// Unknown pairs only pass the inherited definitions through.
pub fn preprocessor_definitions(configuration: &str, platform: &str) -> &'static str {
    match (configuration, platform) {
        ("Debug", "Win32") => "WIN32;_DEBUG;_CONSOLE;%(PreprocessorDefinitions)",
        ("Release", "Win32") => "WIN32;NDEBUG;_CONSOLE;%(PreprocessorDefinitions)",
        ("Debug", "x64") => "_DEBUG;_CONSOLE;%(PreprocessorDefinitions)",
        ("Release", "x64") => "NDEBUG;_CONSOLE;%(PreprocessorDefinitions)",
        _ => "%(PreprocessorDefinitions)",
    }
}

/// Compiler settings for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSettings {
    pub warning_level: &'static str,
    pub treat_warnings_as_errors: bool,
    pub sdl_check: bool,
    pub conformance_mode: bool,
    pub language_standard: &'static str,
    pub language_standard_c: &'static str,
    pub build_stl_modules: bool,
    pub preprocessor_definitions: &'static str,
    /// Release only.
    pub function_level_linking: bool,
    /// Release only.
    pub intrinsic_functions: bool,
}

impl CompileSettings {
    pub fn for_cell(cell: MatrixCell) -> Self {
        let release = cell.configuration.is_release();
        CompileSettings {
            warning_level: "Level4",
            treat_warnings_as_errors: true,
            sdl_check: true,
            conformance_mode: true,
            language_standard: "stdcpplatest",
            language_standard_c: "stdclatest",
            build_stl_modules: true,
            preprocessor_definitions: preprocessor_definitions(
                cell.configuration.as_str(),
                cell.platform.as_str(),
            ),
            function_level_linking: release,
            intrinsic_functions: release,
        }
    }
}

/// Linker settings for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    pub subsystem: &'static str,
    pub generate_debug_information: bool,
}

impl LinkSettings {
    pub fn for_cell(_cell: MatrixCell) -> Self {
        LinkSettings {
            subsystem: "Console",
            generate_debug_information: true,
        }
    }
}
