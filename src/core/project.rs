//! Project root discovery and canonical project paths.
//!
//! The project root is the nearest ancestor of the working directory that
//! contains the manifest marker file. Every other path is a plain join
//! against that root; nothing here checks whether those paths exist.

use std::path::{Path, PathBuf};

use crate::core::configuration::BuildConfiguration;
use crate::core::errors::CxxError;

/// Name of the manifest marker file.
pub const MANIFEST_FILE: &str = "cxx.jsonc";

/// Base name of the generated solution and project.
pub const PROJECT_NAME: &str = "app";

/// Resolved paths for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    /// Walk upward from `start` and return the first directory holding the manifest.
    pub fn discover(start: &Path) -> Result<Self, CxxError> {
        let root = find_root(start).ok_or_else(|| CxxError::ManifestNotFound {
            dir: start.to_path_buf(),
        })?;

        tracing::debug!("project root: {}", root.display());
        Ok(ProjectPaths { root })
    }

    /// Use `root` as the project root without searching.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        ProjectPaths { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Directory scanned for sources.
    pub fn src(&self) -> PathBuf {
        self.root.join("src")
    }

    /// Build output directory; the generated descriptors live here.
    pub fn build(&self) -> PathBuf {
        self.root.join("build")
    }

    /// Output directory for one configuration (`build/debug`, `build/release`).
    pub fn output_dir(&self, config: BuildConfiguration) -> PathBuf {
        self.build().join(config.dir_name())
    }

    /// Built executable for one configuration.
    pub fn executable(&self, config: BuildConfiguration) -> PathBuf {
        self.output_dir(config).join(format!("{}.exe", PROJECT_NAME))
    }

    pub fn publish(&self) -> PathBuf {
        self.build().join("publish")
    }

    pub fn solution_file(&self) -> PathBuf {
        self.build().join(format!("{}.slnx", PROJECT_NAME))
    }

    pub fn project_file(&self) -> PathBuf {
        self.build().join(format!("{}.vcxproj", PROJECT_NAME))
    }

    /// Project-local configuration directory.
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(".cxx")
    }
}

/// Nearest ancestor of `start` (inclusive) containing the manifest.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf)
}
