//! Core data structures.
//!
//! - Project root discovery and canonical paths
//! - The configuration x platform matrix
//! - The error taxonomy surfaced to the CLI

pub mod configuration;
pub mod errors;
pub mod project;

pub use configuration::{matrix, BuildConfiguration, MatrixCell, Platform};
pub use errors::CxxError;
pub use project::{ProjectPaths, MANIFEST_FILE, PROJECT_NAME};
