//! `cxx devenv` command

use anyhow::Result;

use crate::cli::DevenvArgs;
use cxx::util::{GlobalContext, Status};

pub async fn execute(ctx: &GlobalContext, args: DevenvArgs) -> Result<i32> {
    let shell = ctx.shell();
    let span = shell.span(Status::Capturing, "developer environment");
    let env = ctx.dev_environment(args.refresh).await?;
    span.finish_with_message(format!("{} variables", env.len()));

    if let Some(cache) = ctx.dev_environment_cache() {
        shell.note(format!("cache: {}", cache.path().display()));
    }
    if let Some(rc) = env.resource_compiler() {
        shell.note(format!("resource compiler: {}", rc.display()));
    }

    if args.print {
        for (name, value) in env.iter() {
            shell.println(format!("{}={}", name, value));
        }
    }
    Ok(0)
}
