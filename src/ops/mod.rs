//! High-level operations.
//!
//! This module contains the implementation of cxx commands.

pub mod cxx_build;
pub mod cxx_clean;
pub mod cxx_format;
pub mod cxx_generate;
pub mod cxx_new;
pub mod cxx_tool;

pub use cxx_build::{build, publish, run, BuildOptions, PublishOutcome};
pub use cxx_clean::clean;
pub use cxx_format::{format_all, FormatOptions, FormatReport};
pub use cxx_generate::{generate, GenerateOptions, GenerateResult};
pub use cxx_new::{install, new_project, NewResult};
pub use cxx_tool::{run_tool, tool_paths, Passthrough};
