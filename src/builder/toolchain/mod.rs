//! Compiler-suite discovery and derived tool paths.
//!
//! Discovery picks one installation of the suite (see [`latest_installation`])
//! and every tool path is then computed from its install directory. Paths
//! that do not exist on disk resolve to `None`; only invoking a missing tool
//! is an error.
//!
//! Installation selection priority:
//! 1. `toolchain.install_path` from config
//! 2. The installation with the greatest version string reported by vswhere

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::CxxError;

mod detect;
mod msvc;

pub use detect::{find_vswhere, latest_installation, locate_installation, VsInstance, VsWhere};
pub use msvc::{latest_version_dir, msvc_bin_dir};

/// Version string reported for an installation taken from config.
pub const CONFIGURED_VERSION: &str = "configured";

/// One installed copy of the compiler suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainInstallation {
    pub install_path: PathBuf,
    pub version: String,
}

impl ToolchainInstallation {
    pub fn new(install_path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        ToolchainInstallation {
            install_path: install_path.into(),
            version: version.into(),
        }
    }

    /// Path of `tool` inside this installation, if it exists.
    ///
    /// Tools that live outside the installation (formatter) return `None`.
    pub fn tool(&self, tool: Tool) -> Option<PathBuf> {
        let path = match tool {
            Tool::MsBuild => self
                .install_path
                .join("MSBuild")
                .join("Current")
                .join("Bin")
                .join("amd64")
                .join("MSBuild.exe"),
            Tool::Compiler | Tool::Linker | Tool::Librarian => {
                msvc_bin_dir(&self.install_path)?.join(tool.file_name())
            }
            Tool::Ninja => self
                .install_path
                .join("Common7")
                .join("IDE")
                .join("CommonExtensions")
                .join("Microsoft")
                .join("CMake")
                .join("Ninja")
                .join("ninja.exe"),
            Tool::Vcpkg => self.install_path.join("VC").join("vcpkg").join("vcpkg.exe"),
            Tool::DevCmd => self
                .install_path
                .join("Common7")
                .join("Tools")
                .join("VsDevCmd.bat"),
            Tool::ClangFormat => return None,
        };
        path.is_file().then_some(path)
    }
}

impl fmt::Display for ToolchainInstallation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.install_path.display(), self.version)
    }
}

/// Tools resolved through the toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Build-invoker
    MsBuild,
    Compiler,
    Linker,
    Librarian,
    /// Secondary build engine
    Ninja,
    /// Package manager
    Vcpkg,
    /// Source formatter
    ClangFormat,
    /// Environment-initialization script
    DevCmd,
}

impl Tool {
    pub const ALL: [Tool; 8] = [
        Tool::MsBuild,
        Tool::Compiler,
        Tool::Linker,
        Tool::Librarian,
        Tool::Ninja,
        Tool::Vcpkg,
        Tool::ClangFormat,
        Tool::DevCmd,
    ];

    /// File name of the tool.
    pub fn file_name(&self) -> &'static str {
        match self {
            Tool::MsBuild => "MSBuild.exe",
            Tool::Compiler => "cl.exe",
            Tool::Linker => "link.exe",
            Tool::Librarian => "lib.exe",
            Tool::Ninja => "ninja.exe",
            Tool::Vcpkg => "vcpkg.exe",
            Tool::ClangFormat => "clang-format.exe",
            Tool::DevCmd => "VsDevCmd.bat",
        }
    }

    /// Name used for PATH lookups.
    fn command_name(&self) -> &'static str {
        match self {
            Tool::Vcpkg => "vcpkg",
            Tool::ClangFormat => "clang-format",
            other => other.file_name(),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// The located toolchain: an optional installation plus the lookups that
/// do not depend on it.
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    installation: Option<ToolchainInstallation>,
    vcpkg_root: Option<PathBuf>,
}

impl Toolchain {
    pub fn new(installation: Option<ToolchainInstallation>, vcpkg_root: Option<PathBuf>) -> Self {
        Toolchain {
            installation,
            vcpkg_root,
        }
    }

    pub fn installation(&self) -> Option<&ToolchainInstallation> {
        self.installation.as_ref()
    }

    /// Path of `tool`, or `None` if it cannot be found.
    ///
    /// The package manager falls back to its root directory and then PATH;
    /// the formatter is only ever looked up on PATH.
    pub fn path(&self, tool: Tool) -> Option<PathBuf> {
        let colocated = self.installation.as_ref().and_then(|i| i.tool(tool));
        match tool {
            Tool::Vcpkg => colocated
                .or_else(|| {
                    self.vcpkg_root
                        .as_deref()
                        .map(|root| root.join(tool.file_name()))
                        .filter(|p| p.is_file())
                })
                .or_else(|| which::which(tool.command_name()).ok()),
            Tool::ClangFormat => which::which(tool.command_name()).ok(),
            _ => colocated,
        }
    }

    /// Path of `tool`, failing with [`CxxError::ToolNotFound`] when absent.
    pub fn require(&self, tool: Tool) -> Result<PathBuf, CxxError> {
        self.path(tool)
            .ok_or_else(|| CxxError::tool_not_found(tool.file_name()))
    }

    /// Install directory, if an installation was found.
    pub fn install_path(&self) -> Option<&Path> {
        self.installation.as_ref().map(|i| i.install_path.as_path())
    }
}
