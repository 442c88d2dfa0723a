//! Implementation of `cxx clean`.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::{BuildConfiguration, CxxError, ProjectPaths};
use crate::util::fs::{remove_dir_all_if_exists, remove_file_if_exists};

/// Remove the configuration output directories and the generated descriptors.
///
/// Fails with [`CxxError::BuildDirectoryMissing`] if there is no build
/// directory at all. Returns what was actually removed.
pub fn clean(paths: &ProjectPaths) -> Result<Vec<PathBuf>> {
    let build_dir = paths.build();
    if !build_dir.is_dir() {
        return Err(CxxError::BuildDirectoryMissing { dir: build_dir }.into());
    }

    let mut removed = Vec::new();

    for config in BuildConfiguration::ALL {
        let dir = paths.output_dir(config);
        if remove_dir_all_if_exists(&dir)? {
            removed.push(dir);
        }
    }

    for file in [paths.solution_file(), paths.project_file()] {
        if remove_file_if_exists(&file)? {
            removed.push(file);
        }
    }

    tracing::debug!("removed {} entries", removed.len());
    Ok(removed)
}
