use crate::foundation::error::{QrFrameError, QrFrameResult};
use crate::foundation::xml::{escape_attr, escape_text};

/// SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
/// XLink namespace URI.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// XML declaration prefixed to serialized documents.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Child of an [`SvgElement`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SvgNode {
    /// Nested element.
    Element(SvgElement),
    /// Character data.
    Text(String),
}

/// Owned SVG element: qualified name, attributes in document order, children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<SvgNode>,
}

impl SvgElement {
    /// Empty element named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`SvgElement::set_attr`].
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Qualified element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Append a child element.
    pub fn push_element(&mut self, child: SvgElement) {
        self.children.push(SvgNode::Element(child));
    }

    /// All children.
    pub fn children(&self) -> &[SvgNode] {
        &self.children
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &SvgElement> {
        self.children.iter().filter_map(|c| match c {
            SvgNode::Element(e) => Some(e),
            SvgNode::Text(_) => None,
        })
    }

    /// Every descendant element named `name`, depth-first.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a SvgElement> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a SvgElement>) {
        for child in self.elements() {
            if child.name == name {
                out.push(child);
            }
            child.collect_named(name, out);
        }
    }

    /// Return `true` when this element or a descendant uses an `xlink:` attribute.
    pub fn uses_xlink(&self) -> bool {
        self.attributes.iter().any(|(k, _)| k.starts_with("xlink:"))
            || self.elements().any(SvgElement::uses_xlink)
    }

    /// Parse a standalone SVG document and return its root element.
    ///
    /// Elements outside the SVG namespace (editor metadata and the like) are dropped, as are
    /// comments, processing instructions and whitespace-only text.
    pub fn parse_document(markup: &str) -> QrFrameResult<Self> {
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(markup, opts)
            .map_err(|e| QrFrameError::serialization(format!("parse frame background: {e}")))?;
        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(QrFrameError::serialization(format!(
                "frame background root is <{}>, expected <svg>",
                root.tag_name().name()
            )));
        }
        convert(root).ok_or_else(|| QrFrameError::serialization("frame background is not svg"))
    }

    /// Serialize this element and its subtree.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    /// Serialize as a standalone document with an XML declaration.
    pub fn to_document(&self) -> String {
        format!("{XML_DECLARATION}{}", self.to_xml())
    }

    fn write_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attributes {
            out.push_str(&format!(" {k}=\"{}\"", escape_attr(v)));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                SvgNode::Element(e) => e.write_xml(out),
                SvgNode::Text(t) => out.push_str(&escape_text(t)),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn in_svg_namespace(ns: Option<&str>) -> bool {
    matches!(ns, None | Some(SVG_NS))
}

fn convert(node: roxmltree::Node<'_, '_>) -> Option<SvgElement> {
    if !node.is_element() || !in_svg_namespace(node.tag_name().namespace()) {
        return None;
    }
    let mut el = SvgElement::new(node.tag_name().name());
    for attr in node.attributes() {
        let name = match attr.namespace() {
            None => attr.name().to_string(),
            Some(XLINK_NS) => format!("xlink:{}", attr.name()),
            Some(XML_NS) => format!("xml:{}", attr.name()),
            Some(_) => continue,
        };
        el.attributes.push((name, attr.value().to_string()));
    }
    for child in node.children() {
        if child.is_text() {
            if let Some(text) = child.text().filter(|t| !t.trim().is_empty()) {
                el.children.push(SvgNode::Text(text.to_string()));
            }
        } else if let Some(sub) = convert(child) {
            el.children.push(SvgNode::Element(sub));
        }
    }
    Some(el)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/svg_tree.rs"]
mod tests;
