//! Solution and project descriptors consumed by MSBuild.

pub mod project;
pub mod solution;
pub mod xml;

pub use project::{ProjectDocument, SourceFileSet};
pub use solution::{ProjectId, SolutionDocument};
