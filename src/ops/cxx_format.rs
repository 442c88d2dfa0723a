//! Implementation of `cxx format`.
//!
//! Every source under `src/` is formatted in place by its own
//! `clang-format -i` process, with at most `jobs` processes alive at once.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio_util::sync::CancellationToken;

use crate::builder::toolchain::Tool;
use crate::core::{CxxError, ProjectPaths};
use crate::util::fs::{find_files_recursive, relative_path, to_forward_slashes};
use crate::util::jobs::{default_jobs, run_bounded, JobOutcome};
use crate::util::process::ProcessBuilder;
use crate::util::shell::{Shell, Status};
use crate::util::GlobalContext;

/// Extensions picked up by the formatter.
pub const FORMAT_EXTENSIONS: [&str; 7] = ["c", "cpp", "cxx", "h", "hpp", "hxx", "ixx"];

/// Options for the format command.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Concurrent formatter processes (None = logical CPU count)
    pub jobs: Option<usize>,
}

/// Per-file results of a format run.
#[derive(Debug, Default)]
pub struct FormatReport {
    pub formatted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    pub cancelled: usize,
}

impl FormatReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.cancelled == 0
    }

    pub fn total(&self) -> usize {
        self.formatted.len() + self.failed.len() + self.cancelled
    }
}

/// Format every source file of the project.
///
/// With no matching files this returns an empty report without looking
/// for the formatter.
pub async fn format_all(
    ctx: &GlobalContext,
    paths: &ProjectPaths,
    opts: &FormatOptions,
    token: &CancellationToken,
) -> Result<FormatReport> {
    let files = source_files(&paths.src())?;
    if files.is_empty() {
        tracing::debug!("no sources to format");
        return Ok(FormatReport::default());
    }

    let formatter = ctx.require_tool(Tool::ClangFormat).await?;
    let jobs = opts.jobs.unwrap_or_else(default_jobs);
    Ok(format_files(files, &formatter, jobs, paths.root(), ctx.shell(), token).await)
}

/// Sources under `src` with a formattable extension.
pub fn source_files(src: &Path) -> Result<Vec<PathBuf>> {
    if !src.is_dir() {
        return Err(CxxError::SourcesUnreadable {
            dir: src.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into());
    }
    find_files_recursive(src, &FORMAT_EXTENSIONS)
}

/// Run `formatter -i <file>` over `files`, `jobs` at a time.
///
/// A file fails if the formatter exits non-zero or writes anything to
/// stderr. Failures are collected, never propagated.
pub async fn format_files(
    files: Vec<PathBuf>,
    formatter: &Path,
    jobs: usize,
    display_root: &Path,
    shell: &Arc<Shell>,
    token: &CancellationToken,
) -> FormatReport {
    let formatter = formatter.to_path_buf();
    let worker_shell = Arc::clone(shell);
    let root = display_root.to_path_buf();

    let outcomes = run_bounded(files.clone(), jobs, token, move |file: PathBuf, token| {
        let formatter = formatter.clone();
        let shell = Arc::clone(&worker_shell);
        let shown = to_forward_slashes(&relative_path(&root, &file));
        async move {
            let pb = ProcessBuilder::new(&formatter).arg("-i").arg(&file);
            let Some(output) = pb.exec_cancellable(&token).await? else {
                return Ok(None);
            };

            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if !stderr.is_empty() {
                return Err(anyhow!(stderr));
            }
            if !output.status.success() {
                return Err(anyhow!("exited with code {:?}", output.status.code()));
            }

            shell.status(Status::Formatted, shown);
            Ok(Some(file))
        }
    })
    .await;

    let mut report = FormatReport::default();
    for (file, outcome) in files.into_iter().zip(outcomes) {
        match outcome {
            JobOutcome::Done(file) => report.formatted.push(file),
            JobOutcome::Failed(e) => {
                let shown = to_forward_slashes(&relative_path(display_root, &file));
                shell.error(format!("failed to format {}: {:#}", shown, e));
                report.failed.push((file, format!("{:#}", e)));
            }
            JobOutcome::Cancelled => report.cancelled += 1,
        }
    }
    report
}
