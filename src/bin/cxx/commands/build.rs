//! `cxx build` command

use anyhow::Result;

use super::build_options;
use crate::cli::BuildArgs;
use cxx::ops::build;
use cxx::util::GlobalContext;

pub async fn execute(ctx: &GlobalContext, args: BuildArgs) -> Result<i32> {
    let paths = ctx.project()?;
    let opts = build_options(ctx, &args);
    build(ctx, &paths, &opts).await
}
