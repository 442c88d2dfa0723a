//! Error taxonomy surfaced to the CLI.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Exit code for "something required was not found" failures.
pub const EXIT_NOT_FOUND: i32 = 2;

/// Exit code for every other failure.
pub const EXIT_FAILURE: i32 = 1;

/// Errors that callers classify rather than just print.
#[derive(Debug, Error, Diagnostic)]
pub enum CxxError {
    #[error("`cxx.jsonc` not found in `{dir}` or any parent directory")]
    #[diagnostic(
        code(cxx::discovery::manifest_not_found),
        help("Run `cxx new` in an empty directory to create a project")
    )]
    ManifestNotFound { dir: PathBuf },

    #[error("{tool} not found")]
    #[diagnostic(
        code(cxx::discovery::tool_not_found),
        help("Install Visual Studio (or the Build Tools) with the C++ workload, or set `toolchain.install_path` in .cxx/config.toml")
    )]
    ToolNotFound { tool: String },

    #[error("developer environment unavailable: {reason}")]
    #[diagnostic(code(cxx::capture::unavailable))]
    DevEnvironmentUnavailable { reason: String },

    #[error("failed to read sources directory `{dir}`")]
    #[diagnostic(code(cxx::generate::sources_unreadable))]
    SourcesUnreadable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("build directory `{dir}` does not exist")]
    #[diagnostic(code(cxx::clean::no_build_dir))]
    BuildDirectoryMissing { dir: PathBuf },

    #[error("directory `{dir}` is not empty")]
    #[diagnostic(code(cxx::new::not_empty))]
    DirectoryNotEmpty { dir: PathBuf },
}

impl CxxError {
    /// Convenience constructor for [`CxxError::ToolNotFound`].
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        CxxError::ToolNotFound { tool: tool.into() }
    }

    /// Process exit code for this error class.
    pub fn exit_code(&self) -> i32 {
        match self {
            CxxError::ManifestNotFound { .. }
            | CxxError::ToolNotFound { .. }
            | CxxError::BuildDirectoryMissing { .. } => EXIT_NOT_FOUND,
            _ => EXIT_FAILURE,
        }
    }
}

/// Pick the exit code for an arbitrary error chain.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<CxxError>())
        .map(CxxError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CxxError::tool_not_found("MSBuild.exe").exit_code(), EXIT_NOT_FOUND);
        assert_eq!(
            CxxError::ManifestNotFound { dir: PathBuf::from("/") }.exit_code(),
            EXIT_NOT_FOUND
        );
        assert_eq!(
            CxxError::DevEnvironmentUnavailable { reason: "x".into() }.exit_code(),
            EXIT_FAILURE
        );
    }

    #[test]
    fn test_exit_code_through_context() {
        let err: anyhow::Error = Err::<(), _>(CxxError::tool_not_found("clang-format"))
            .context("formatting failed")
            .unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_NOT_FOUND);

        let plain = anyhow::anyhow!("disk full");
        assert_eq!(exit_code_for(&plain), EXIT_FAILURE);
    }
}
