//! Implementation of `cxx new` and `cxx install`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::toolchain::Tool;
use crate::core::{CxxError, ProjectPaths, MANIFEST_FILE};
use crate::util::fs::{ensure_dir, is_empty_dir, write_string};
use crate::util::process::{exit_code, ProcessBuilder};
use crate::util::shell::Status;
use crate::util::GlobalContext;

/// Triplet used for both target and host package builds.
pub const VCPKG_TRIPLET: &str = "x64-windows-static-md";

const HELLO_WORLD: &str = r#"#include <print>

auto wmain() -> int {
    std::println("Hello, World!");

    return 0;
}
"#;

/// Files created by `new_project`.
#[derive(Debug)]
pub struct NewResult {
    pub manifest: PathBuf,
    pub main_source: Option<PathBuf>,
    /// Whether the package manager created its own manifest
    pub package_manifest: bool,
}

/// A package manager invocation with the project's default triplets.
pub fn vcpkg_command(vcpkg: &Path) -> ProcessBuilder {
    ProcessBuilder::new(vcpkg)
        .env("VCPKG_DEFAULT_TRIPLET", VCPKG_TRIPLET)
        .env("VCPKG_DEFAULT_HOST_TRIPLET", VCPKG_TRIPLET)
}

/// Scaffold a project in `dir`, which must be empty or absent.
///
/// The package manager step is optional: when it is missing or fails the
/// scaffold still completes with a warning.
pub async fn new_project(ctx: &GlobalContext, dir: &Path) -> Result<NewResult> {
    if dir.exists() && !is_empty_dir(dir)? {
        return Err(CxxError::DirectoryNotEmpty {
            dir: dir.to_path_buf(),
        }
        .into());
    }
    ensure_dir(dir)?;

    let paths = ProjectPaths::at(dir);
    let manifest = paths.manifest();
    write_string(&manifest, "{}")?;
    tracing::debug!("wrote {}", MANIFEST_FILE);

    let shell = ctx.shell();
    let package_manifest = match ctx.toolchain().await.path(Tool::Vcpkg) {
        Some(vcpkg) => {
            let status = vcpkg_command(&vcpkg)
                .args(["new", "--application"])
                .cwd(dir)
                .status()
                .await?;
            if status.success() {
                true
            } else {
                shell.warn(format!(
                    "`vcpkg new` failed with exit code {}",
                    exit_code(status)
                ));
                false
            }
        }
        None => {
            shell.warn("vcpkg not found; skipping package manifest");
            false
        }
    };

    let src = paths.src();
    ensure_dir(&src)?;
    let app = src.join("app.cpp");
    let main_source = if app.exists() {
        None
    } else {
        write_string(&app, HELLO_WORLD)?;
        Some(app)
    };

    shell.status(Status::Created, format!("project at `{}`", dir.display()));

    Ok(NewResult {
        manifest,
        main_source,
        package_manifest,
    })
}

/// Install the project's package dependencies and return the exit code.
pub async fn install(ctx: &GlobalContext, paths: &ProjectPaths) -> Result<i32> {
    let vcpkg = ctx.require_tool(Tool::Vcpkg).await?;

    ctx.shell().status(Status::Installing, "dependencies");
    let status = vcpkg_command(&vcpkg)
        .arg("install")
        .cwd(paths.root())
        .status()
        .await
        .context("failed to run the package manager")?;
    Ok(exit_code(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::config::Config;
    use crate::util::shell::{ColorChoice, Shell, Verbosity};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context(cwd: &Path, config: Config) -> GlobalContext {
        let shell = Arc::new(Shell::new(Verbosity::Quiet, ColorChoice::Never));
        GlobalContext::with_cwd(cwd.to_path_buf(), shell).with_config(config)
    }

    fn no_tools(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.toolchain.install_path = Some(tmp.path().join("no-vs"));
        config.toolchain.vcpkg_root = Some(tmp.path().join("no-vcpkg"));
        config
    }

    #[tokio::test]
    async fn test_new_scaffolds_empty_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("hello");
        let ctx = context(tmp.path(), no_tools(&tmp));

        let result = new_project(&ctx, &dir).await.unwrap();
        assert_eq!(fs::read_to_string(dir.join("cxx.jsonc")).unwrap(), "{}");
        let app = fs::read_to_string(dir.join("src/app.cpp")).unwrap();
        assert!(app.contains("#include <print>"));
        assert!(app.contains("auto wmain() -> int"));
        assert_eq!(result.main_source, Some(dir.join("src/app.cpp")));
        assert!(ProjectPaths::discover(&dir).is_ok());
    }

    #[tokio::test]
    async fn test_new_refuses_non_empty_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();
        let ctx = context(tmp.path(), no_tools(&tmp));

        let err = new_project(&ctx, tmp.path()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CxxError>(),
            Some(CxxError::DirectoryNotEmpty { .. })
        ));
        assert!(!tmp.path().join("cxx.jsonc").exists());
    }

    #[tokio::test]
    async fn test_install_without_vcpkg() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(tmp.path(), no_tools(&tmp));

        let err = install(&ctx, &ProjectPaths::at(tmp.path())).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CxxError>(),
            Some(CxxError::ToolNotFound { .. })
        ));
    }

    #[cfg(unix)]
    fn stub_vcpkg(root: &Path) {
        use std::os::unix::fs::PermissionsExt;

        fs::create_dir_all(root).unwrap();
        let exe = root.join("vcpkg.exe");
        fs::write(
            &exe,
            "#!/bin/sh\necho \"$@ $VCPKG_DEFAULT_TRIPLET $VCPKG_DEFAULT_HOST_TRIPLET\" >> vcpkg.log\n",
        )
        .unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_new_runs_package_manager() {
        let tmp = TempDir::new().unwrap();
        let mut config = no_tools(&tmp);
        let vcpkg_root = tmp.path().join("vcpkg");
        stub_vcpkg(&vcpkg_root);
        config.toolchain.vcpkg_root = Some(vcpkg_root);
        let dir = tmp.path().join("hello");
        let ctx = context(tmp.path(), config);

        let result = new_project(&ctx, &dir).await.unwrap();
        assert!(result.package_manifest);
        let log = fs::read_to_string(dir.join("vcpkg.log")).unwrap();
        assert_eq!(
            log.trim(),
            "new --application x64-windows-static-md x64-windows-static-md"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_install_runs_in_root() {
        let tmp = TempDir::new().unwrap();
        let mut config = no_tools(&tmp);
        let vcpkg_root = tmp.path().join("vcpkg");
        stub_vcpkg(&vcpkg_root);
        config.toolchain.vcpkg_root = Some(vcpkg_root);
        let root = tmp.path().join("proj");
        fs::create_dir_all(&root).unwrap();
        let ctx = context(&root, config);

        let code = install(&ctx, &ProjectPaths::at(&root)).await.unwrap();
        assert_eq!(code, 0);
        let log = fs::read_to_string(root.join("vcpkg.log")).unwrap();
        assert!(log.starts_with("install x64-windows-static-md"));
    }
}
