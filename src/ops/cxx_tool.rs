//! Passthrough to toolchain executables and toolchain reporting.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::toolchain::{find_vswhere, Tool, Toolchain};
use crate::core::CxxError;
use crate::ops::cxx_new::vcpkg_command;
use crate::util::process::{exit_code, ProcessBuilder};
use crate::util::GlobalContext;

/// Tools reachable through `cxx <tool> [args..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passthrough {
    MsBuild,
    Vcpkg,
    Ninja,
    VsWhere,
}

/// Run a located tool with `args` in the working directory and return its
/// exit code.
///
/// Ninja needs the developer environment to find the compiler, so it is
/// captured (or loaded from cache) first.
pub async fn run_tool(ctx: &GlobalContext, tool: Passthrough, args: &[String]) -> Result<i32> {
    let pb = match tool {
        Passthrough::MsBuild => ProcessBuilder::new(ctx.require_tool(Tool::MsBuild).await?),
        Passthrough::Vcpkg => vcpkg_command(&ctx.require_tool(Tool::Vcpkg).await?),
        Passthrough::Ninja => {
            let ninja = ctx.require_tool(Tool::Ninja).await?;
            let env = ctx.dev_environment(false).await?;
            env.apply(ProcessBuilder::new(ninja))
        }
        Passthrough::VsWhere => {
            ProcessBuilder::new(find_vswhere().ok_or_else(|| CxxError::tool_not_found("vswhere.exe"))?)
        }
    };

    let pb = pb.args(args).cwd(ctx.cwd());
    tracing::debug!("running `{}`", pb.display_command());
    Ok(exit_code(pb.status().await?))
}

/// Every tool with its resolved path, `None` when unavailable.
pub fn tool_paths(toolchain: &Toolchain) -> Vec<(Tool, Option<PathBuf>)> {
    Tool::ALL
        .into_iter()
        .map(|tool| (tool, toolchain.path(tool)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::ToolchainInstallation;
    use crate::core::errors::{exit_code_for, EXIT_NOT_FOUND};
    use crate::util::config::Config;
    use crate::util::shell::{ColorChoice, Shell, Verbosity};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context(tmp: &TempDir) -> GlobalContext {
        let mut config = Config::default();
        config.toolchain.install_path = Some(tmp.path().join("vs"));
        let shell = Arc::new(Shell::new(Verbosity::Quiet, ColorChoice::Never));
        GlobalContext::with_cwd(tmp.path().to_path_buf(), shell)
            .with_config(config)
            .with_data_dir(tmp.path().join("data"))
    }

    #[test]
    fn test_tool_paths_lists_every_tool() {
        let tmp = TempDir::new().unwrap();
        let msbuild = tmp.path().join("MSBuild/Current/Bin/amd64/MSBuild.exe");
        fs::create_dir_all(msbuild.parent().unwrap()).unwrap();
        fs::write(&msbuild, "").unwrap();

        let toolchain = Toolchain::new(Some(ToolchainInstallation::new(tmp.path(), "17.0")), None);
        let paths = tool_paths(&toolchain);
        assert_eq!(paths.len(), Tool::ALL.len());
        assert_eq!(paths[0], (Tool::MsBuild, Some(msbuild)));
        assert!(paths.iter().any(|(t, p)| *t == Tool::Ninja && p.is_none()));
    }

    #[tokio::test]
    async fn test_missing_tool_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);

        let err = run_tool(&ctx, Passthrough::MsBuild, &[]).await.unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_NOT_FOUND);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_passthrough_forwards_args_and_code() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let exe = tmp.path().join("vs/MSBuild/Current/Bin/amd64/MSBuild.exe");
        fs::create_dir_all(exe.parent().unwrap()).unwrap();
        fs::write(&exe, "#!/bin/sh\necho \"$@\" > args.txt\nexit 7\n").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        let ctx = context(&tmp);

        let args = vec!["-version".to_string(), "-nologo".to_string()];
        let code = run_tool(&ctx, Passthrough::MsBuild, &args).await.unwrap();
        assert_eq!(code, 7);
        assert_eq!(
            fs::read_to_string(tmp.path().join("args.txt")).unwrap().trim(),
            "-version -nologo"
        );
    }
}
