//! Installation enumeration and selection.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::util::config::ToolchainConfig;
use crate::util::process::ProcessBuilder;

use super::{ToolchainInstallation, CONFIGURED_VERSION};

/// Pick the installation with the greatest version string.
///
/// Versions are compared as plain strings, not as semantic versions. The
/// source is consumed exactly once; on equal versions the first one seen
/// is kept.
pub fn latest_installation<I>(installations: I) -> Option<ToolchainInstallation>
where
    I: IntoIterator<Item = ToolchainInstallation>,
{
    let mut latest: Option<ToolchainInstallation> = None;
    for candidate in installations {
        tracing::debug!("found installation {}", candidate);
        let newer = match &latest {
            Some(current) => candidate.version.as_str() > current.version.as_str(),
            None => true,
        };
        if newer {
            latest = Some(candidate);
        }
    }
    latest
}

/// One record of `vswhere -format json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsInstance {
    pub installation_path: PathBuf,
    #[serde(default)]
    pub installation_version: String,
}

impl From<VsInstance> for ToolchainInstallation {
    fn from(instance: VsInstance) -> Self {
        ToolchainInstallation::new(instance.installation_path, instance.installation_version)
    }
}

/// Installed instances as reported by vswhere, yielded one at a time.
#[derive(Debug)]
pub struct VsWhere {
    instances: std::vec::IntoIter<VsInstance>,
}

impl VsWhere {
    /// Query every installed instance, including prereleases.
    pub async fn query(vswhere: PathBuf) -> Result<Self> {
        let pb = ProcessBuilder::new(vswhere).args([
            "-all",
            "-prerelease",
            "-products",
            "*",
            "-format",
            "json",
            "-utf8",
        ]);
        let output = pb.exec().await?;
        if !output.status.success() {
            bail!(
                "`{}` exited with {:?}: {}",
                pb.display_command(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Self::parse(&output.stdout)
    }

    /// Parse vswhere's JSON array.
    pub fn parse(json: &[u8]) -> Result<Self> {
        let instances: Vec<VsInstance> =
            serde_json::from_slice(json).context("failed to parse vswhere output")?;
        Ok(VsWhere {
            instances: instances.into_iter(),
        })
    }
}

impl Iterator for VsWhere {
    type Item = ToolchainInstallation;

    fn next(&mut self) -> Option<Self::Item> {
        self.instances.next().map(ToolchainInstallation::from)
    }
}

/// Find vswhere.exe: the installer's fixed location, then PATH.
pub fn find_vswhere() -> Option<PathBuf> {
    let program_files_x86 = std::env::var_os("ProgramFiles(x86)")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Program Files (x86)"));

    let standard_path = program_files_x86
        .join("Microsoft Visual Studio")
        .join("Installer")
        .join("vswhere.exe");

    if standard_path.is_file() {
        return Some(standard_path);
    }

    which::which("vswhere").ok()
}

/// Locate the installation to use.
///
/// A configured `install_path` wins without enumerating. Otherwise vswhere
/// is queried; any failure there means "no installation", not an error.
pub async fn locate_installation(config: &ToolchainConfig) -> Option<ToolchainInstallation> {
    if let Some(path) = &config.install_path {
        tracing::debug!("using configured installation {}", path.display());
        return Some(ToolchainInstallation::new(path, CONFIGURED_VERSION));
    }

    let Some(vswhere) = find_vswhere() else {
        tracing::debug!("vswhere.exe not found, no installation to enumerate");
        return None;
    };

    match VsWhere::query(vswhere).await {
        Ok(instances) => latest_installation(instances),
        Err(e) => {
            tracing::debug!("failed to enumerate installations: {:#}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installs(versions: &[&str]) -> Vec<ToolchainInstallation> {
        versions
            .iter()
            .enumerate()
            .map(|(i, v)| ToolchainInstallation::new(format!("/vs/{}", i), *v))
            .collect()
    }

    #[test]
    fn test_latest_is_string_greatest() {
        for order in [
            ["17.0", "17.9", "18.0-beta"],
            ["18.0-beta", "17.0", "17.9"],
            ["17.9", "18.0-beta", "17.0"],
        ] {
            let latest = latest_installation(installs(&order)).unwrap();
            assert_eq!(latest.version, "18.0-beta");
        }
    }

    #[test]
    fn test_latest_not_semver_aware() {
        let latest = latest_installation(installs(&["17.10", "17.9"])).unwrap();
        assert_eq!(latest.version, "17.9");
    }

    #[test]
    fn test_tie_keeps_first() {
        let latest = latest_installation(installs(&["17.9", "17.9"])).unwrap();
        assert_eq!(latest.install_path, PathBuf::from("/vs/0"));
    }

    #[test]
    fn test_empty_enumeration() {
        assert!(latest_installation(Vec::new()).is_none());
    }

    #[test]
    fn test_vswhere_parse() {
        let json = br#"[
            {"instanceId": "a", "installationPath": "C:\\VS\\2022", "installationVersion": "17.9.34616.47"},
            {"instanceId": "b", "installationPath": "C:\\VS\\Preview", "installationVersion": "17.10.34707.107"}
        ]"#;

        let found: Vec<_> = VsWhere::parse(json).unwrap().collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].install_path, PathBuf::from(r"C:\VS\2022"));

        let latest = latest_installation(VsWhere::parse(json).unwrap()).unwrap();
        assert_eq!(latest.version, "17.9.34616.47");
    }

    #[test]
    fn test_vswhere_parse_rejects_garbage() {
        assert!(VsWhere::parse(b"not json").is_err());
    }

    #[tokio::test]
    async fn test_configured_install_path_wins() {
        let config = ToolchainConfig {
            install_path: Some(PathBuf::from("/opt/vs")),
            vcpkg_root: None,
        };
        let install = locate_installation(&config).await.unwrap();
        assert_eq!(install.install_path, PathBuf::from("/opt/vs"));
        assert_eq!(install.version, CONFIGURED_VERSION);
    }
}
