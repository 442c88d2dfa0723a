//! Element model for the generated descriptors.
//!
//! Descriptors are built as an [`Element`] tree and serialized with the
//! `xml` crate's event writer: two-space indentation, self-closed empty
//! elements, text-only elements on one line.

use anyhow::{Context, Result};
use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute; attributes keep insertion order.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append a child `<name>text</name>`.
    pub fn property(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.child(Element::new(name).text(value))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text children.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Serialize as a complete document with an XML declaration.
    pub fn to_document(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut writer = EmitterConfig::new()
            .perform_indent(true)
            .indent_string("  ")
            .pad_self_closing(true)
            .create_writer(&mut buf);

        writer
            .write(XmlEvent::StartDocument {
                version: XmlVersion::Version10,
                encoding: Some("utf-8"),
                standalone: None,
            })
            .context("failed to write XML declaration")?;
        self.write_to(&mut writer)
            .with_context(|| format!("failed to serialize <{}>", self.name))?;
        drop(writer);

        let mut out = String::from_utf8(buf).context("serialized XML is not UTF-8")?;
        out.push('\n');
        Ok(out)
    }

    fn write_to<W: std::io::Write>(&self, writer: &mut EventWriter<W>) -> xml::writer::Result<()> {
        let mut start = XmlEvent::start_element(self.name.as_str());
        for (name, value) in &self.attributes {
            start = start.attr(name.as_str(), value.as_str());
        }
        writer.write(start)?;

        for child in &self.children {
            match child {
                Node::Element(e) => e.write_to(writer)?,
                Node::Text(t) => writer.write(XmlEvent::characters(t))?,
            }
        }
        writer.write(XmlEvent::end_element())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_document() {
        let doc = Element::new("Solution")
            .child(Element::new("Configurations").child(Element::new("Platform").attr("Name", "x64")))
            .child(Element::new("Project").attr("Path", "app.vcxproj"))
            .to_document()
            .unwrap();

        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        let lines: Vec<&str> = doc.lines().skip(1).collect();
        assert_eq!(
            lines,
            [
                "<Solution>",
                "  <Configurations>",
                "    <Platform Name=\"x64\" />",
                "  </Configurations>",
                "  <Project Path=\"app.vcxproj\" />",
                "</Solution>",
            ]
        );
    }

    #[test]
    fn test_property_inline() {
        let group = Element::new("PropertyGroup").property("OutDir", r"$(SolutionDir)\debug\");
        let doc = group.to_document().unwrap();
        assert!(doc.contains("  <OutDir>$(SolutionDir)\\debug\\</OutDir>\n"));
    }

    #[test]
    fn test_escaping() {
        let e = Element::new("A").attr("Condition", "\"b\" & c").text("<x>");
        let doc = e.to_document().unwrap();
        assert!(doc.contains("Condition=\"&quot;b&quot; &amp; c\""));
        assert!(doc.contains(">&lt;x&gt;</A>"));
    }

    #[test]
    fn test_accessors() {
        let e = Element::new("ItemGroup")
            .attr("Label", "ProjectConfigurations")
            .child(Element::new("ClCompile"));
        assert_eq!(e.attribute("Label"), Some("ProjectConfigurations"));
        assert_eq!(e.attribute("Condition"), None);
        assert_eq!(e.elements().count(), 1);
    }
}
