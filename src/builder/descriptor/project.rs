//! The project descriptor (`.vcxproj`).
//!
//! The document is a fixed sequence of blocks. The consuming build tool
//! resolves later blocks against earlier ones, so [`ProjectDocument::blocks`]
//! must keep this order:
//!
//! 1. Globals
//! 2. `Microsoft.Cpp.Default.props`
//! 3. One configuration property group per matrix cell
//! 4. `ProjectConfigurations`
//! 5. `Microsoft.Cpp.props`
//! 6. `ExtensionSettings` and `Shared` import groups
//! 7. One user property sheet import group per matrix cell
//! 8. `UserMacros`
//! 9. One item definition group per matrix cell
//! 10. Empty item group
//! 11. `Microsoft.Cpp.targets`
//! 12. `ExtensionTargets`
//! 13. Package manager properties
//! 14. Source items

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::{matrix, CxxError, MatrixCell};
use crate::util::fs::{has_extension, relative_path, to_forward_slashes};

use super::xml::Element;

pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";
pub const PROJECT_GUID: &str = "{4985344b-071c-4114-a0bb-41d2b55773cd}";
pub const PLATFORM_TOOLSET: &str = "v145";

const COMPILE_EXTENSIONS: [&str; 1] = ["cpp"];
const MODULE_EXTENSIONS: [&str; 1] = ["ixx"];
const HEADER_EXTENSIONS: [&str; 1] = ["h"];

/// Files found directly under the sources directory.
///
/// Paths are relative to the build directory, with forward slashes, each
/// group sorted by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFileSet {
    pub compile_units: Vec<String>,
    pub module_units: Vec<String>,
    pub headers: Vec<String>,
}

impl SourceFileSet {
    /// Scan `src` (not recursively), expressing paths relative to `build`.
    pub fn scan(src: &Path, build: &Path) -> Result<Self, CxxError> {
        let unreadable = |source| CxxError::SourcesUnreadable {
            dir: src.to_path_buf(),
            source,
        };

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(src).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            if entry.file_type().map_err(unreadable)?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let pick = |extensions: &[&str]| -> Vec<String> {
            files
                .iter()
                .filter(|f| has_extension(f, extensions))
                .map(|f| to_forward_slashes(&relative_path(build, f)))
                .collect()
        };

        Ok(SourceFileSet {
            compile_units: pick(&COMPILE_EXTENSIONS),
            module_units: pick(&MODULE_EXTENSIONS),
            headers: pick(&HEADER_EXTENSIONS),
        })
    }

    pub fn len(&self) -> usize {
        self.compile_units.len() + self.module_units.len() + self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The generated project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDocument {
    pub root_namespace: String,
    pub sources: SourceFileSet,
}

impl ProjectDocument {
    pub fn new(root_namespace: impl Into<String>, sources: SourceFileSet) -> Self {
        ProjectDocument {
            root_namespace: root_namespace.into(),
            sources,
        }
    }

    /// Top-level blocks in document order.
    pub fn blocks(&self) -> Vec<Element> {
        let cells: Vec<MatrixCell> = matrix().collect();
        let mut blocks = Vec::new();

        blocks.push(self.globals());
        blocks.push(import(r"$(VCTargetsPath)\Microsoft.Cpp.Default.props"));
        blocks.extend(cells.iter().map(configuration_group));
        blocks.push(project_configurations(&cells));
        blocks.push(import(r"$(VCTargetsPath)\Microsoft.Cpp.props"));
        blocks.push(Element::new("ImportGroup").attr("Label", "ExtensionSettings"));
        blocks.push(Element::new("ImportGroup").attr("Label", "Shared"));
        blocks.extend(cells.iter().map(property_sheets));
        blocks.push(Element::new("PropertyGroup").attr("Label", "UserMacros"));
        blocks.extend(cells.iter().map(item_definition_group));
        blocks.push(Element::new("ItemGroup"));
        blocks.push(import(r"$(VCTargetsPath)\Microsoft.Cpp.targets"));
        blocks.push(Element::new("ImportGroup").attr("Label", "ExtensionTargets"));
        blocks.push(
            Element::new("PropertyGroup")
                .attr("Label", "Vcpkg")
                .property("VcpkgEnableManifest", "true")
                .property("VcpkgUseStatic", "true")
                .property("VcpkgUseMD", "true"),
        );
        blocks.push(self.source_items());

        blocks
    }

    pub fn to_element(&self) -> Element {
        Element::new("Project")
            .attr("DefaultTargets", "Build")
            .attr("xmlns", MSBUILD_NAMESPACE)
            .children(self.blocks())
    }

    pub fn to_xml(&self) -> Result<String> {
        self.to_element().to_document()
    }

    fn globals(&self) -> Element {
        Element::new("PropertyGroup")
            .attr("Label", "Globals")
            .property("VCProjectVersion", "18.0")
            .property("Keyword", "Win32Proj")
            .property("ProjectGuid", PROJECT_GUID)
            .property("RootNamespace", &self.root_namespace)
            .property("WindowsTargetPlatformVersion", "10.0")
            .property("UseMultiToolTask", "true")
            .property("EnforceProcessCountAcrossBuilds", "true")
    }

    fn source_items(&self) -> Element {
        let item = |kind: &str, path: &String| Element::new(kind).attr("Include", path);
        let sources = &self.sources;

        Element::new("ItemGroup")
            .children(sources.compile_units.iter().map(|p| item("ClCompile", p)))
            .children(sources.module_units.iter().map(|p| item("ClCompile", p)))
            .children(sources.headers.iter().map(|p| item("ClInclude", p)))
    }
}

fn import(project: &str) -> Element {
    Element::new("Import").attr("Project", project)
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn configuration_group(cell: &MatrixCell) -> Element {
    let dir = cell.configuration.dir_name();
    Element::new("PropertyGroup")
        .attr("Condition", cell.condition())
        .attr("Label", "Configuration")
        .property("ConfigurationType", "Application")
        .property("UseDebugLibraries", bool_str(!cell.configuration.is_release()))
        .property("PlatformToolset", PLATFORM_TOOLSET)
        .property("CharacterSet", "Unicode")
        .property("EnableUnitySupport", "false")
        .property("IntDir", format!(r"$(SolutionDir)\{}\obj\", dir))
        .property("OutDir", format!(r"$(SolutionDir)\{}\", dir))
}

fn project_configurations(cells: &[MatrixCell]) -> Element {
    Element::new("ItemGroup")
        .attr("Label", "ProjectConfigurations")
        .children(cells.iter().map(|cell| {
            Element::new("ProjectConfiguration")
                .attr("Include", cell.key())
                .property("Configuration", cell.configuration.as_str())
                .property("Platform", cell.platform.as_str())
        }))
}

fn property_sheets(cell: &MatrixCell) -> Element {
    let user_props = r"$(UserRootDir)\Microsoft.Cpp.$(Platform).user.props";
    Element::new("ImportGroup")
        .attr("Label", "PropertySheets")
        .attr("Condition", cell.condition())
        .child(
            import(user_props)
                .attr("Condition", format!("exists('{}')", user_props))
                .attr("Label", "LocalAppDataPlatform"),
        )
}

fn item_definition_group(cell: &MatrixCell) -> Element {
    let compile = cell.compile_settings();
    let link = cell.link_settings();

    let mut cl = Element::new("ClCompile")
        .property("WarningLevel", compile.warning_level)
        .property("TreatWarningAsError", bool_str(compile.treat_warnings_as_errors))
        .property("SDLCheck", bool_str(compile.sdl_check))
        .property("ConformanceMode", bool_str(compile.conformance_mode))
        .property("LanguageStandard", compile.language_standard)
        .property("LanguageStandard_C", compile.language_standard_c)
        .property("BuildStlModules", bool_str(compile.build_stl_modules))
        .property("PreprocessorDefinitions", compile.preprocessor_definitions);
    if compile.function_level_linking {
        cl = cl.property("FunctionLevelLinking", "true");
    }
    if compile.intrinsic_functions {
        cl = cl.property("IntrinsicFunctions", "true");
    }

    Element::new("ItemDefinitionGroup")
        .attr("Condition", cell.condition())
        .child(cl)
        .child(
            Element::new("Link")
                .property("SubSystem", link.subsystem)
                .property(
                    "GenerateDebugInformation",
                    bool_str(link.generate_debug_information),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_sources() -> SourceFileSet {
        SourceFileSet {
            compile_units: vec!["../src/app.cpp".into()],
            module_units: vec!["../src/math.ixx".into()],
            headers: vec!["../src/app.h".into()],
        }
    }

    fn label(e: &Element) -> Option<&str> {
        e.attribute("Label")
    }

    #[test]
    fn test_block_order() {
        let blocks = ProjectDocument::new("app", sample_sources()).blocks();
        let summary: Vec<String> = blocks
            .iter()
            .map(|b| match (label(b), b.attribute("Project")) {
                (Some(l), _) => format!("{}:{}", b.name(), l),
                (None, Some(p)) => format!("Import:{}", p.rsplit('\\').next().unwrap()),
                (None, None) => b.name().to_string(),
            })
            .collect();

        let expected = [
            "PropertyGroup:Globals",
            "Import:Microsoft.Cpp.Default.props",
            "PropertyGroup:Configuration",
            "PropertyGroup:Configuration",
            "PropertyGroup:Configuration",
            "PropertyGroup:Configuration",
            "ItemGroup:ProjectConfigurations",
            "Import:Microsoft.Cpp.props",
            "ImportGroup:ExtensionSettings",
            "ImportGroup:Shared",
            "ImportGroup:PropertySheets",
            "ImportGroup:PropertySheets",
            "ImportGroup:PropertySheets",
            "ImportGroup:PropertySheets",
            "PropertyGroup:UserMacros",
            "ItemDefinitionGroup",
            "ItemDefinitionGroup",
            "ItemDefinitionGroup",
            "ItemDefinitionGroup",
            "ItemGroup",
            "Import:Microsoft.Cpp.targets",
            "ImportGroup:ExtensionTargets",
            "PropertyGroup:Vcpkg",
            "ItemGroup",
        ];
        assert_eq!(summary, expected);
    }

    #[test]
    fn test_configuration_groups_precede_enumeration() {
        let blocks = ProjectDocument::new("app", SourceFileSet::default()).blocks();
        let enumeration = blocks
            .iter()
            .position(|b| label(b) == Some("ProjectConfigurations"))
            .unwrap();
        let last_config = blocks
            .iter()
            .rposition(|b| label(b) == Some("Configuration"))
            .unwrap();
        assert!(last_config < enumeration);

        let targets = blocks
            .iter()
            .rposition(|b| b.name() == "Import")
            .unwrap();
        assert!(blocks[targets].attribute("Project").unwrap().ends_with("Microsoft.Cpp.targets"));
    }

    #[test]
    fn test_item_definitions() {
        let blocks = ProjectDocument::new("app", SourceFileSet::default()).blocks();
        let groups: Vec<_> = blocks
            .iter()
            .filter(|b| b.name() == "ItemDefinitionGroup")
            .collect();
        assert_eq!(groups.len(), 4);

        for group in groups {
            let condition = group.attribute("Condition").unwrap();
            let cl = group.elements().find(|e| e.name() == "ClCompile").unwrap();
            let prop = |name: &str| {
                cl.elements()
                    .find(|e| e.name() == name)
                    .map(|e| e.text_content())
            };

            let release = condition.contains("Release|");
            assert_eq!(prop("FunctionLevelLinking").is_some(), release);
            assert_eq!(prop("IntrinsicFunctions").is_some(), release);
            assert_eq!(prop("WarningLevel").as_deref(), Some("Level4"));

            let expected = match condition {
                c if c.ends_with("'Debug|Win32'") => "WIN32;_DEBUG;_CONSOLE;%(PreprocessorDefinitions)",
                c if c.ends_with("'Release|Win32'") => "WIN32;NDEBUG;_CONSOLE;%(PreprocessorDefinitions)",
                c if c.ends_with("'Debug|x64'") => "_DEBUG;_CONSOLE;%(PreprocessorDefinitions)",
                c if c.ends_with("'Release|x64'") => "NDEBUG;_CONSOLE;%(PreprocessorDefinitions)",
                other => panic!("unexpected condition {}", other),
            };
            assert_eq!(prop("PreprocessorDefinitions").as_deref(), Some(expected));

            let link = group.elements().find(|e| e.name() == "Link").unwrap();
            assert_eq!(link.elements().count(), 2);
        }
    }

    #[test]
    fn test_source_items() {
        let doc = ProjectDocument::new("app", sample_sources());
        let items = doc.blocks().pop().unwrap();
        let rendered: Vec<_> = items
            .elements()
            .map(|e| format!("{}={}", e.name(), e.attribute("Include").unwrap()))
            .collect();
        assert_eq!(
            rendered,
            [
                "ClCompile=../src/app.cpp",
                "ClCompile=../src/math.ixx",
                "ClInclude=../src/app.h"
            ]
        );
    }

    #[test]
    fn test_output_directories() {
        let xml = ProjectDocument::new("app", SourceFileSet::default()).to_xml().unwrap();
        assert!(xml.contains(r"<IntDir>$(SolutionDir)\release\obj\</IntDir>"));
        assert!(xml.contains(r"<OutDir>$(SolutionDir)\debug\</OutDir>"));
        assert!(xml.contains("<PlatformToolset>v145</PlatformToolset>"));
        assert!(xml.contains(
            "<Project DefaultTargets=\"Build\" xmlns=\"http://schemas.microsoft.com/developer/msbuild/2003\">"
        ));
    }

    #[test]
    fn test_deterministic() {
        let a = ProjectDocument::new("app", sample_sources()).to_xml().unwrap();
        let b = ProjectDocument::new("app", sample_sources()).to_xml().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scan_sources() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let build = tmp.path().join("build");
        std::fs::create_dir_all(src.join("nested")).unwrap();
        for name in ["zeta.cpp", "app.cpp", "mod.ixx", "app.h", "util.hpp", "notes.txt"] {
            std::fs::write(src.join(name), "").unwrap();
        }
        std::fs::write(src.join("nested").join("deep.cpp"), "").unwrap();

        let set = SourceFileSet::scan(&src, &build).unwrap();
        assert_eq!(set.compile_units, ["../src/app.cpp", "../src/zeta.cpp"]);
        assert_eq!(set.module_units, ["../src/mod.ixx"]);
        assert_eq!(set.headers, ["../src/app.h"]);
    }

    #[test]
    fn test_scan_missing_sources() {
        let tmp = TempDir::new().unwrap();
        let err = SourceFileSet::scan(&tmp.path().join("src"), tmp.path()).unwrap_err();
        assert!(matches!(err, CxxError::SourcesUnreadable { .. }));
    }
}
