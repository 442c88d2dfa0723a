//! Developer environment capture.
//!
//! The vendor's environment script is sourced in a `cmd.exe` subshell that
//! then dumps its environment with `set`. The result is memoized by the
//! caller and mirrored to a JSON cache so later runs skip the subshell.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::toolchain::{Tool, Toolchain};
use crate::core::CxxError;
use crate::util::fs::ensure_dir;
use crate::util::process::ProcessBuilder;

/// Arguments passed to the environment script.
const DEV_CMD_ARGS: &str = "-arch=amd64 -host_arch=amd64";

/// Environment variables with case-insensitive names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevEnvironment {
    /// Uppercased name -> (name as captured, value).
    vars: BTreeMap<String, (String, String)>,
}

impl DevEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `NAME=VALUE` lines.
    ///
    /// Each line is split on the first `=` and both sides are kept as-is,
    /// apart from a stray trailing `\r`. Lines without `=` or with an empty
    /// name are skipped; a later duplicate replaces an earlier one.
    pub fn parse(output: &str) -> Self {
        let mut env = DevEnvironment::new();
        for line in output.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            match line.split_once('=') {
                Some((name, value)) if !name.is_empty() => env.insert(name, value),
                _ => continue,
            }
        }
        env
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.vars
            .insert(name.to_ascii_uppercase(), (name, value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(&name.to_ascii_uppercase())
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variables in name order, with names as captured.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .values()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Search the captured `PATH` for `file_name`.
    pub fn find_on_path(&self, file_name: &str) -> Option<PathBuf> {
        self.get("PATH")?
            .split(';')
            .filter(|dir| !dir.is_empty())
            .map(|dir| Path::new(dir).join(file_name))
            .find(|candidate| candidate.is_file())
    }

    /// The resource compiler of the active Windows SDK.
    pub fn resource_compiler(&self) -> Option<PathBuf> {
        self.get("WindowsSdkVerBinPath")
            .map(|bin| Path::new(bin).join("x64").join("rc.exe"))
            .filter(|rc| rc.is_file())
            .or_else(|| self.find_on_path("rc.exe"))
    }

    /// Apply every variable to a process.
    pub fn apply(&self, mut pb: ProcessBuilder) -> ProcessBuilder {
        for (name, value) in self.iter() {
            pb = pb.env(name, value);
        }
        pb
    }
}

impl FromIterator<(String, String)> for DevEnvironment {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut env = DevEnvironment::new();
        for (name, value) in iter {
            env.insert(name, value);
        }
        env
    }
}

/// On-disk mirror of a captured environment.
///
/// The cache is advisory: a missing or unreadable file is simply a miss,
/// and a failed write is logged and ignored.
#[derive(Debug, Clone)]
pub struct DevEnvironmentCache {
    path: PathBuf,
}

impl DevEnvironmentCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DevEnvironmentCache { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<DevEnvironment> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
            Ok(map) if !map.is_empty() => Some(map.into_iter().collect()),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("discarding environment cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Write the environment as indented JSON, creating parent directories.
    pub fn store(&self, env: &DevEnvironment) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(&env.iter().collect::<BTreeMap<_, _>>())
            .context("failed to serialize environment")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    /// [`store`](Self::store), logging instead of failing.
    pub fn store_or_warn(&self, env: &DevEnvironment) {
        if let Err(e) = self.store(env) {
            tracing::warn!("failed to write environment cache: {:#}", e);
        }
    }
}

/// Run the toolchain's environment script and capture the result.
pub async fn capture_dev_environment(toolchain: &Toolchain) -> Result<DevEnvironment> {
    let script = toolchain
        .path(Tool::DevCmd)
        .ok_or_else(|| CxxError::DevEnvironmentUnavailable {
            reason: format!("{} not found", Tool::DevCmd),
        })?;

    // A batch file sidesteps cmd.exe's quoting rules for the script path.
    let mut batch = tempfile::Builder::new()
        .prefix("cxx-devenv-")
        .suffix(".bat")
        .tempfile()
        .context("failed to create environment batch file")?;
    write!(
        batch,
        "@echo off\r\ncall \"{}\" {} >nul\r\nif errorlevel 1 exit /b 1\r\nset\r\n",
        script.display(),
        DEV_CMD_ARGS
    )
    .context("failed to write environment batch file")?;
    batch.flush()?;

    tracing::debug!("capturing environment from {}", script.display());
    let pb = ProcessBuilder::new("cmd.exe").arg("/c").arg(batch.path());
    capture_with(&pb).await
}

/// Run `pb` and parse its standard output as an environment dump.
pub async fn capture_with(pb: &ProcessBuilder) -> Result<DevEnvironment> {
    let output = pb.exec().await.map_err(|e| CxxError::DevEnvironmentUnavailable {
        reason: format!("{:#}", e),
    })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(CxxError::DevEnvironmentUnavailable {
            reason: format!(
                "`{}` exited with {:?}: {}",
                pb.display_command(),
                output.status.code(),
                stderr.trim()
            ),
        }
        .into());
    }
    if !stderr.trim().is_empty() {
        tracing::warn!("environment script: {}", stderr.trim());
    }

    let env = DevEnvironment::parse(&String::from_utf8_lossy(&output.stdout));
    if env.is_empty() {
        return Err(CxxError::DevEnvironmentUnavailable {
            reason: "the environment script produced no variables".to_string(),
        }
        .into());
    }
    Ok(env)
}
