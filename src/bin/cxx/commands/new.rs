//! `cxx new` command

use anyhow::Result;

use crate::cli::NewArgs;
use cxx::ops::new_project;
use cxx::util::GlobalContext;

pub async fn execute(ctx: &GlobalContext, args: NewArgs) -> Result<i32> {
    let dir = match args.path {
        Some(path) if path.is_absolute() => path,
        Some(path) => ctx.cwd().join(path),
        None => ctx.cwd().to_path_buf(),
    };

    new_project(ctx, &dir).await?;
    Ok(0)
}
