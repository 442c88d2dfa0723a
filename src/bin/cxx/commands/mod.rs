//! Command implementations

pub mod build;
pub mod clean;
pub mod completions;
pub mod devenv;
pub mod format;
pub mod generate;
pub mod install;
pub mod new;
pub mod publish;
pub mod run;
pub mod tool;
pub mod toolchain;

use cxx::ops::{BuildOptions, GenerateOptions};
use cxx::util::GlobalContext;

use crate::cli::BuildArgs;

/// Build options from the command line, falling back to configuration.
pub(crate) fn build_options(ctx: &GlobalContext, args: &BuildArgs) -> BuildOptions {
    let config = ctx.config();
    BuildOptions {
        configuration: args
            .configuration
            .unwrap_or_else(|| config.build_configuration()),
        generate: GenerateOptions::from_stable_flag(config.stable_project_id() && !args.random_id),
    }
}
