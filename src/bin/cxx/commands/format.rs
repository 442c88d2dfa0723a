//! `cxx format` command

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::cli::FormatArgs;
use cxx::core::errors::EXIT_FAILURE;
use cxx::ops::{format_all, FormatOptions};
use cxx::util::{GlobalContext, Status};

pub async fn execute(
    ctx: &GlobalContext,
    args: FormatArgs,
    token: &CancellationToken,
) -> Result<i32> {
    let paths = ctx.project()?;
    let opts = FormatOptions {
        jobs: args.jobs.or(ctx.config().format.jobs),
    };

    let shell = ctx.shell();
    let span = shell.span(Status::Formatting, "sources");
    let report = format_all(ctx, &paths, &opts, token).await?;

    if report.cancelled > 0 {
        shell.warn(format!("interrupted; {} files not formatted", report.cancelled));
    }
    if !report.failed.is_empty() {
        shell.error(format!(
            "{} of {} files failed to format",
            report.failed.len(),
            report.total()
        ));
    }

    if report.is_success() {
        span.finish_with_message(format!("{} files", report.formatted.len()));
        Ok(0)
    } else {
        Ok(EXIT_FAILURE)
    }
}
