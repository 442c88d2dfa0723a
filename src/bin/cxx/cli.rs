//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use cxx::core::BuildConfiguration;
use cxx::util::shell::ColorChoice;

/// cxx - Build orchestrator for MSVC/MSBuild C++ projects
#[derive(Parser)]
#[command(name = "cxx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project
    New(NewArgs),

    /// Install project dependencies
    Install,

    /// Generate the solution and project files
    Generate,

    /// Build the project
    Build(BuildArgs),

    /// Build and run the project
    Run(RunArgs),

    /// Build in release and copy the executable to build/publish
    Publish,

    /// Remove build outputs and generated files
    Clean,

    /// Format project sources with clang-format
    Format(FormatArgs),

    /// Run MSBuild with the given arguments
    #[command(name = "msbuild")]
    MsBuild(PassthroughArgs),

    /// Run vcpkg with the given arguments
    Vcpkg(PassthroughArgs),

    /// Run ninja inside the developer environment
    Ninja(PassthroughArgs),

    /// Run vswhere with the given arguments
    #[command(name = "vswhere")]
    VsWhere(PassthroughArgs),

    /// Show the selected Visual Studio installation and tool paths
    #[command(visible_alias = "vs")]
    Toolchain,

    /// Capture the developer environment
    Devenv(DevenvArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct NewArgs {
    /// Directory to create the project in (defaults to the current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Build configuration: debug or release
    pub configuration: Option<BuildConfiguration>,

    /// Use a fresh random project id in the solution
    #[arg(long)]
    pub random_id: bool,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Arguments passed to the executable
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct FormatArgs {
    /// Number of concurrent clang-format processes
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct PassthroughArgs {
    /// Arguments forwarded to the tool
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct DevenvArgs {
    /// Ignore and overwrite the cached environment
    #[arg(long)]
    pub refresh: bool,

    /// Print every captured variable
    #[arg(long)]
    pub print: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
