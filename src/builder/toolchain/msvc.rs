//! MSVC toolset layout.

use std::path::{Path, PathBuf};

/// Directory holding `cl.exe`, `link.exe` and `lib.exe` for an x64 host and target.
///
/// Picks the newest versioned folder under `VC/Tools/MSVC`.
pub fn msvc_bin_dir(install_path: &Path) -> Option<PathBuf> {
    let toolsets = install_path.join("VC").join("Tools").join("MSVC");
    let version_dir = latest_version_dir(&toolsets)?;
    Some(version_dir.join("bin").join("Hostx64").join("x64"))
}

/// The subdirectory of `dir` with the greatest name.
///
/// Names are compared as plain strings, so `14.9` sorts after `14.40`.
/// Equal names cannot occur within one directory.
pub fn latest_version_dir(dir: &Path) -> Option<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("cannot read {}: {}", dir.display(), e);
            return None;
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.path())
        .max_by(|a, b| a.file_name().cmp(&b.file_name()))
}
