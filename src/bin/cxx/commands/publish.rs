//! `cxx publish` command

use anyhow::Result;

use cxx::ops::{publish, GenerateOptions, PublishOutcome};
use cxx::util::GlobalContext;

pub async fn execute(ctx: &GlobalContext) -> Result<i32> {
    let paths = ctx.project()?;
    let generate = GenerateOptions::from_stable_flag(ctx.config().stable_project_id());

    match publish(ctx, &paths, generate).await? {
        PublishOutcome::Published(_) => Ok(0),
        PublishOutcome::BuildFailed(code) => Ok(code),
    }
}
