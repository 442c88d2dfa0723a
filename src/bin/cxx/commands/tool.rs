//! Passthrough commands: `cxx msbuild`, `cxx vcpkg`, `cxx ninja`, `cxx vswhere`

use anyhow::Result;

use crate::cli::PassthroughArgs;
use cxx::ops::{run_tool, Passthrough};
use cxx::util::GlobalContext;

pub async fn execute(ctx: &GlobalContext, tool: Passthrough, args: PassthroughArgs) -> Result<i32> {
    run_tool(ctx, tool, &args.args).await
}
