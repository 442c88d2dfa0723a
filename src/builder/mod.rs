//! Toolchain discovery, developer environment capture and descriptor generation.

pub mod descriptor;
pub mod devenv;
pub mod toolchain;

pub use descriptor::{ProjectDocument, SolutionDocument, SourceFileSet};
pub use devenv::{capture_dev_environment, DevEnvironment, DevEnvironmentCache};
pub use toolchain::{latest_installation, Tool, Toolchain, ToolchainInstallation};
