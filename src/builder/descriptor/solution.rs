//! The solution descriptor (`.slnx`).

use std::path::Path;

use anyhow::Result;
use uuid::Uuid;

use super::xml::Element;

/// Platforms listed by the solution.
pub const SOLUTION_PLATFORMS: [&str; 2] = ["x64", "x86"];

/// How the project reference's id is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectId {
    /// Name-based UUID of the project root; same root, same id.
    Stable,
    /// Fresh random UUID on every generation.
    Random,
}

impl ProjectId {
    pub fn resolve(self, root: &Path) -> Uuid {
        match self {
            ProjectId::Stable => {
                let name = root.to_string_lossy();
                Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes())
            }
            ProjectId::Random => Uuid::new_v4(),
        }
    }
}

/// A solution referencing exactly one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionDocument {
    pub platforms: Vec<String>,
    pub project_path: String,
    pub project_id: Uuid,
}

impl SolutionDocument {
    pub fn new(project_path: impl Into<String>, project_id: Uuid) -> Self {
        SolutionDocument {
            platforms: SOLUTION_PLATFORMS.iter().map(|p| p.to_string()).collect(),
            project_path: project_path.into(),
            project_id,
        }
    }

    pub fn to_element(&self) -> Element {
        let configurations = Element::new("Configurations").children(
            self.platforms
                .iter()
                .map(|p| Element::new("Platform").attr("Name", p)),
        );

        Element::new("Solution").child(configurations).child(
            Element::new("Project")
                .attr("Path", &self.project_path)
                .attr("Id", self.project_id.hyphenated().to_string()),
        )
    }

    pub fn to_xml(&self) -> Result<String> {
        self.to_element().to_document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_project_reference() {
        let doc = SolutionDocument::new("app.vcxproj", Uuid::nil());
        let root = doc.to_element();

        let projects: Vec<_> = root.elements().filter(|e| e.name() == "Project").collect();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].attribute("Path"), Some("app.vcxproj"));
        assert_eq!(
            projects[0].attribute("Id"),
            Some("00000000-0000-0000-0000-000000000000")
        );

        let platforms: Vec<_> = root
            .elements()
            .find(|e| e.name() == "Configurations")
            .unwrap()
            .elements()
            .filter_map(|p| p.attribute("Name"))
            .collect();
        assert_eq!(platforms, ["x64", "x86"]);
    }

    #[test]
    fn test_stable_id_depends_on_root() {
        let a = ProjectId::Stable.resolve(Path::new("/work/a"));
        assert_eq!(a, ProjectId::Stable.resolve(Path::new("/work/a")));
        assert_ne!(a, ProjectId::Stable.resolve(Path::new("/work/b")));
    }

    #[test]
    fn test_random_id_changes() {
        let root = Path::new("/work/a");
        assert_ne!(ProjectId::Random.resolve(root), ProjectId::Random.resolve(root));
    }
}
