//! `cxx clean` command

use anyhow::Result;

use cxx::ops::clean;
use cxx::util::{GlobalContext, Status};

pub fn execute(ctx: &GlobalContext) -> Result<i32> {
    let paths = ctx.project()?;
    let removed = clean(&paths)?;

    let shell = ctx.shell();
    if removed.is_empty() {
        shell.note("nothing to clean");
    }
    for path in removed {
        shell.status(Status::Removed, path.display());
    }
    Ok(0)
}
