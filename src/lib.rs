//! cxx - A build orchestrator for MSVC/MSBuild C++ projects
//!
//! This crate provides the library behind the `cxx` command: toolchain
//! discovery, developer environment capture, solution and project
//! generation, and the build, run, clean and format operations.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use core::{BuildConfiguration, CxxError, ProjectPaths};
pub use util::context::GlobalContext;
