//! `cxx run` command

use anyhow::Result;

use super::build_options;
use crate::cli::RunArgs;
use cxx::ops::run;
use cxx::util::GlobalContext;

pub async fn execute(ctx: &GlobalContext, args: RunArgs) -> Result<i32> {
    let paths = ctx.project()?;
    let opts = build_options(ctx, &args.build);
    run(ctx, &paths, &opts, &args.args).await
}
