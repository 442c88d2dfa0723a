//! Implementation of `cxx build`, `cxx run` and `cxx publish`.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::builder::toolchain::Tool;
use crate::core::{BuildConfiguration, Platform, ProjectPaths, PROJECT_NAME};
use crate::ops::cxx_generate::{generate, GenerateOptions};
use crate::util::fs::{copy_file, ensure_dir};
use crate::util::process::{exit_code, ProcessBuilder};
use crate::util::shell::Status;
use crate::util::GlobalContext;

/// Options for the build command.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub configuration: BuildConfiguration,
    pub generate: GenerateOptions,
}

/// Arguments passed to the build-invoker.
pub fn msbuild_args(configuration: BuildConfiguration) -> Vec<String> {
    vec![
        "-nologo".to_string(),
        "-v:minimal".to_string(),
        format!("/p:Configuration={}", configuration),
        format!("/p:Platform={}", Platform::ACTIVE),
    ]
}

/// Build the project and return the build-invoker's exit code.
///
/// Steps run strictly in order: create the build directory, regenerate
/// the descriptors, locate MSBuild, run it from the build directory.
pub async fn build(ctx: &GlobalContext, paths: &ProjectPaths, opts: &BuildOptions) -> Result<i32> {
    let build_dir = paths.build();
    ensure_dir(&build_dir)?;

    generate(paths, &opts.generate)?;

    let msbuild = ctx.require_tool(Tool::MsBuild).await?;

    let shell = ctx.shell();
    let span = shell.span(
        Status::Building,
        format!("{} ({}|{})", PROJECT_NAME, opts.configuration, Platform::ACTIVE),
    );

    let pb = ProcessBuilder::new(msbuild)
        .args(msbuild_args(opts.configuration))
        .cwd(&build_dir);
    tracing::debug!("running `{}`", pb.display_command());

    let code = exit_code(pb.status().await?);
    if code == 0 {
        span.finish_with_message(format!("{} build", opts.configuration.as_str().to_lowercase()));
    } else {
        shell.error(format!("build failed with exit code {}", code));
    }
    Ok(code)
}

/// Build, then run the built executable and return its exit code.
pub async fn run(
    ctx: &GlobalContext,
    paths: &ProjectPaths,
    opts: &BuildOptions,
    args: &[String],
) -> Result<i32> {
    let code = build(ctx, paths, opts).await?;
    if code != 0 {
        return Ok(code);
    }

    let exe = paths.executable(opts.configuration);
    if !exe.is_file() {
        bail!("build succeeded but `{}` was not produced", exe.display());
    }

    ctx.shell().status(Status::Running, format!("`{}`", exe.display()));
    let status = ProcessBuilder::new(&exe)
        .args(args)
        .cwd(paths.root())
        .status()
        .await?;
    Ok(exit_code(status))
}

/// Outcome of `cxx publish`.
#[derive(Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The executable was copied here.
    Published(PathBuf),
    /// The Release build failed with this exit code.
    BuildFailed(i32),
}

/// Build in Release and copy the executable to the publish directory.
pub async fn publish(
    ctx: &GlobalContext,
    paths: &ProjectPaths,
    generate: GenerateOptions,
) -> Result<PublishOutcome> {
    let opts = BuildOptions {
        configuration: BuildConfiguration::Release,
        generate,
    };
    let code = build(ctx, paths, &opts).await?;
    if code != 0 {
        return Ok(PublishOutcome::BuildFailed(code));
    }

    let built = paths.executable(BuildConfiguration::Release);
    if !built.is_file() {
        bail!("build succeeded but `{}` was not produced", built.display());
    }

    let dest = paths.publish().join(format!("{}.exe", PROJECT_NAME));
    copy_file(&built, &dest)?;
    ctx.shell().status(Status::Published, dest.display());
    Ok(PublishOutcome::Published(dest))
}
