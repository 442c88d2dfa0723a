//! `cxx generate` command

use anyhow::Result;

use cxx::ops::{generate, GenerateOptions};
use cxx::util::{GlobalContext, Status};

pub fn execute(ctx: &GlobalContext) -> Result<i32> {
    let paths = ctx.project()?;
    let opts = GenerateOptions::from_stable_flag(ctx.config().stable_project_id());

    let result = generate(&paths, &opts)?;

    let shell = ctx.shell();
    shell.status(Status::Generated, result.solution_file.display());
    shell.status(
        Status::Generated,
        format!(
            "{} ({} sources)",
            result.project_file.display(),
            result.sources.len()
        ),
    );
    Ok(0)
}
