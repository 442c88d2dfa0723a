//! cxx CLI - build orchestrator for MSVC/MSBuild C++ projects

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use miette::Diagnostic;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use cxx::core::errors::exit_code_for;
use cxx::core::CxxError;
use cxx::ops::Passthrough;
use cxx::util::{GlobalContext, Shell};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("CXX_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("cxx=debug")
        } else {
            EnvFilter::new("cxx=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let shell = Arc::new(Shell::from_flags(cli.quiet, cli.verbose, cli.color));

    let code = match run(cli, Arc::clone(&shell)) {
        Ok(code) => code,
        Err(e) => {
            report(&shell, &e);
            exit_code_for(&e)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli, shell: Arc<Shell>) -> Result<i32> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(async move {
        let ctx = GlobalContext::new(shell)?;

        let token = CancellationToken::new();
        let interrupt = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupt.cancel();
            }
        });

        match cli.command {
            Commands::New(args) => commands::new::execute(&ctx, args).await,
            Commands::Install => commands::install::execute(&ctx).await,
            Commands::Generate => commands::generate::execute(&ctx),
            Commands::Build(args) => commands::build::execute(&ctx, args).await,
            Commands::Run(args) => commands::run::execute(&ctx, args).await,
            Commands::Publish => commands::publish::execute(&ctx).await,
            Commands::Clean => commands::clean::execute(&ctx),
            Commands::Format(args) => commands::format::execute(&ctx, args, &token).await,
            Commands::MsBuild(args) => {
                commands::tool::execute(&ctx, Passthrough::MsBuild, args).await
            }
            Commands::Vcpkg(args) => commands::tool::execute(&ctx, Passthrough::Vcpkg, args).await,
            Commands::Ninja(args) => commands::tool::execute(&ctx, Passthrough::Ninja, args).await,
            Commands::VsWhere(args) => {
                commands::tool::execute(&ctx, Passthrough::VsWhere, args).await
            }
            Commands::Toolchain => commands::toolchain::execute(&ctx).await,
            Commands::Devenv(args) => commands::devenv::execute(&ctx, args).await,
            Commands::Completions(args) => commands::completions::execute(args),
        }
    })
}

/// Print an error with its cause chain and, when known, a help line.
fn report(shell: &Shell, err: &anyhow::Error) {
    shell.println_err(format!("error: {:#}", err));

    let help = err
        .chain()
        .find_map(|e| e.downcast_ref::<CxxError>())
        .and_then(|e| e.help().map(|h| h.to_string()));
    if let Some(help) = help {
        shell.println_err(format!("  help: {}", help));
    }
}
