//! Implementation of `cxx generate`.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::descriptor::{ProjectDocument, ProjectId, SolutionDocument, SourceFileSet};
use crate::core::{ProjectPaths, PROJECT_NAME};
use crate::util::fs::write_atomic;

/// Options for descriptor generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// How the solution's project reference id is chosen
    pub project_id: ProjectId,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            project_id: ProjectId::Stable,
        }
    }
}

impl GenerateOptions {
    pub fn from_stable_flag(stable: bool) -> Self {
        GenerateOptions {
            project_id: if stable {
                ProjectId::Stable
            } else {
                ProjectId::Random
            },
        }
    }
}

/// Generation result.
#[derive(Debug)]
pub struct GenerateResult {
    pub solution_file: PathBuf,
    pub project_file: PathBuf,
    pub sources: SourceFileSet,
}

/// Regenerate both descriptors from the current sources.
///
/// Always rewrites both files; each is replaced atomically.
pub fn generate(paths: &ProjectPaths, opts: &GenerateOptions) -> Result<GenerateResult> {
    let build_dir = paths.build();
    let sources = SourceFileSet::scan(&paths.src(), &build_dir)?;
    tracing::debug!("found {} source files", sources.len());

    let project_file_name = format!("{}.vcxproj", PROJECT_NAME);
    let solution = SolutionDocument::new(project_file_name, opts.project_id.resolve(paths.root()));
    let solution_file = paths.solution_file();
    write_atomic(&solution_file, solution.to_xml()?.as_bytes())?;

    let project = ProjectDocument::new(PROJECT_NAME, sources);
    let project_file = paths.project_file();
    write_atomic(&project_file, project.to_xml()?.as_bytes())?;

    Ok(GenerateResult {
        solution_file,
        project_file,
        sources: project.sources,
    })
}
