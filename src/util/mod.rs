//! Shared utilities

pub mod config;
pub mod context;
pub mod fs;
pub mod jobs;
pub mod process;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use process::ProcessBuilder;
pub use shell::{Shell, Status};
