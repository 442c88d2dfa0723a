//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `<user config dir>/config.toml` - user-wide defaults
//! - Project: `.cxx/config.toml` - project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::BuildConfiguration;

/// Tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Toolchain discovery overrides
    pub toolchain: ToolchainConfig,

    /// Build settings
    pub build: BuildConfig,

    /// Formatter settings
    pub format: FormatConfig,

    /// Descriptor generation settings
    pub generate: GenerateConfig,
}

/// Toolchain discovery overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Use this installation instead of enumerating installed instances.
    pub install_path: Option<PathBuf>,

    /// Package manager root, checked before `VCPKG_ROOT`.
    pub vcpkg_root: Option<PathBuf>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Default configuration for `build` and `run` (debug, release)
    pub configuration: Option<String>,
}

/// Formatter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Concurrent formatter processes (None = logical CPU count)
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Derive the solution's project id from the root path (default true).
    pub stable_project_id: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.toolchain.install_path.is_some() {
            self.toolchain.install_path = other.toolchain.install_path;
        }
        if other.toolchain.vcpkg_root.is_some() {
            self.toolchain.vcpkg_root = other.toolchain.vcpkg_root;
        }
        if other.build.configuration.is_some() {
            self.build.configuration = other.build.configuration;
        }
        if other.format.jobs.is_some() {
            self.format.jobs = other.format.jobs;
        }
        if other.generate.stable_project_id.is_some() {
            self.generate.stable_project_id = other.generate.stable_project_id;
        }
    }

    /// Default build configuration; an unparseable value falls back to Debug.
    pub fn build_configuration(&self) -> BuildConfiguration {
        match self.build.configuration.as_deref() {
            Some(s) => s.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; using Debug", e);
                BuildConfiguration::Debug
            }),
            None => BuildConfiguration::Debug,
        }
    }

    pub fn stable_project_id(&self) -> bool {
        self.generate.stable_project_id.unwrap_or(true)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cxx/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: Option<&Path>) -> Config {
    let mut config = Config::default();

    for path in [global_path, project_path].into_iter().flatten() {
        if path.exists() {
            config.merge(Config::load_or_default(path));
        }
    }

    config
}

/// Project config path (.cxx/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".cxx").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.toolchain.install_path.is_none());
        assert_eq!(config.build_configuration(), BuildConfiguration::Debug);
        assert!(config.stable_project_id());
        assert!(config.format.jobs.is_none());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[toolchain]
install_path = "C:/VS/Community"

[build]
configuration = "release"

[format]
jobs = 3

[generate]
stable_project_id = false
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(
            config.toolchain.install_path,
            Some(PathBuf::from("C:/VS/Community"))
        );
        assert_eq!(config.build_configuration(), BuildConfiguration::Release);
        assert_eq!(config.format.jobs, Some(3));
        assert!(!config.stable_project_id());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.build.configuration = Some("debug".to_string());
        base.format.jobs = Some(4);

        let mut override_cfg = Config::default();
        override_cfg.build.configuration = Some("release".to_string());

        base.merge(override_cfg);

        assert_eq!(base.build_configuration(), BuildConfiguration::Release);
        assert_eq!(base.format.jobs, Some(4));
    }

    #[test]
    fn test_load_config_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = project_config_path(tmp.path());
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();

        std::fs::write(&global, "[format]\njobs = 2\n[build]\nconfiguration = \"release\"\n").unwrap();
        std::fs::write(&project, "[format]\njobs = 8\n").unwrap();

        let config = load_config(Some(&global), Some(&project));
        assert_eq!(config.format.jobs, Some(8));
        assert_eq!(config.build_configuration(), BuildConfiguration::Release);
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[format\njobs = ").unwrap();

        let config = Config::load_or_default(&path);
        assert!(config.format.jobs.is_none());
    }

    #[test]
    fn test_invalid_configuration_value() {
        let mut config = Config::default();
        config.build.configuration = Some("profile".to_string());
        assert_eq!(config.build_configuration(), BuildConfiguration::Debug);
    }
}
