//! `cxx toolchain` command

use anyhow::Result;

use cxx::ops::tool_paths;
use cxx::util::GlobalContext;

pub async fn execute(ctx: &GlobalContext) -> Result<i32> {
    let toolchain = ctx.toolchain().await;
    let shell = ctx.shell();

    match toolchain.installation() {
        Some(install) => {
            shell.println(format!("installation: {}", install.install_path.display()));
            shell.println(format!("version:      {}", install.version));
        }
        None => shell.println("installation: none"),
    }
    shell.println("");

    for (tool, path) in tool_paths(toolchain) {
        let shown = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string());
        shell.println(format!("{:>16}  {}", tool.file_name(), shown));
    }
    Ok(0)
}
