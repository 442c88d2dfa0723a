//! `cxx install` command

use anyhow::Result;

use cxx::ops::install;
use cxx::util::GlobalContext;

pub async fn execute(ctx: &GlobalContext) -> Result<i32> {
    let paths = ctx.project()?;
    install(ctx, &paths).await
}
