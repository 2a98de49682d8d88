//! Owned XML element tree built from quick-xml events.
//!
//! Part parsers dispatch on element names and look at children in arbitrary
//! order, so each part is read once into this small tree instead of being
//! walked as a flat event stream.
//!
//! Names in the tree use the conventional prefix of their namespace
//! (`w:`, `r:`, `a:`, ...) whatever prefix the producer bound it to, so
//! `<ns0:p xmlns:ns0="...wordprocessingml/2006/main">` reads as `w:p`.
//! Names in other namespaces keep the prefix they were written with.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::NsReader;

/// Namespace URIs and the prefix their names are stored under.
const KNOWN_NAMESPACES: &[(&str, &str)] = &[
    ("http://schemas.openxmlformats.org/wordprocessingml/2006/main", "w"),
    ("http://purl.oclc.org/ooxml/wordprocessingml/main", "w"),
    ("http://schemas.openxmlformats.org/officeDocument/2006/relationships", "r"),
    ("http://purl.oclc.org/ooxml/officeDocument/relationships", "r"),
    ("http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing", "wp"),
    ("http://purl.oclc.org/ooxml/drawingml/wordprocessingDrawing", "wp"),
    ("http://schemas.openxmlformats.org/drawingml/2006/main", "a"),
    ("http://purl.oclc.org/ooxml/drawingml/main", "a"),
    ("http://schemas.openxmlformats.org/drawingml/2006/picture", "pic"),
    ("http://purl.oclc.org/ooxml/drawingml/picture", "pic"),
    ("http://schemas.openxmlformats.org/officeDocument/2006/math", "m"),
    ("http://purl.oclc.org/ooxml/officeDocument/math", "m"),
    ("http://schemas.openxmlformats.org/markup-compatibility/2006", "mc"),
    ("urn:schemas-microsoft-com:vml", "v"),
    ("urn:schemas-microsoft-com:office:office", "o"),
    ("urn:schemas-microsoft-com:office:word", "w10"),
];

/// A node of the tree: an element or a run of character data.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element with its qualified name, attributes and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    /// Qualified name with the namespace's conventional prefix (e.g. `w:p`)
    pub name: String,
    /// Attributes in document order, named like elements
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse an XML document and return its root element.
    pub fn parse(xml: &str) -> Result<XmlElement> {
        let mut reader = NsReader::from_str(xml);
        // Whitespace inside w:t with xml:space="preserve" is content
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(Self::from_start(&reader, e));
                }
                Ok(Event::Empty(ref e)) => {
                    let element = Self::from_start(&reader, e);
                    attach(&mut stack, &mut root, element);
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::XmlParse("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, element);
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map(|t| t.into_owned())
                            .unwrap_or_else(|_| String::from_utf8_lossy(e.as_ref()).into_owned());
                        if !text.is_empty() {
                            parent.children.push(XmlNode::Text(text));
                        }
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                        parent.children.push(XmlNode::Text(text));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::XmlParse("unexpected end of document".to_string()));
        }

        root.ok_or_else(|| Error::XmlParse("document has no root element".to_string()))
    }

    fn from_start<R>(reader: &NsReader<R>, e: &BytesStart) -> Self {
        let (ns, _) = reader.resolve_element(e.name());
        let name = canonical_name(e.name(), ns);
        let attributes = e
            .attributes()
            .flatten()
            .map(|attr| {
                let key = if attr.key.as_ref().starts_with(b"xmlns") {
                    String::from_utf8_lossy(attr.key.as_ref()).into_owned()
                } else {
                    let (ns, _) = reader.resolve_attribute(attr.key);
                    canonical_name(attr.key, ns)
                };
                let value = attr
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                (key, value)
            })
            .collect();
        Self {
            name,
            attributes,
            children: Vec::new(),
        }
    }

    /// Builder used by tests and synthetic fixtures.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder used by tests and synthetic fixtures.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// The part of the name after the namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// The namespace prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Attribute value by qualified name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value by local name, ignoring the prefix.
    pub fn attr_local(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.rsplit(':').next() == Some(local))
            .map(|(_, v)| v.as_str())
    }

    /// The ubiquitous `w:val` attribute.
    pub fn val(&self) -> Option<&str> {
        self.attr("w:val").or_else(|| self.attr("m:val"))
    }

    /// Attribute parsed as an integer.
    pub fn attr_int(&self, key: &str) -> Option<i64> {
        self.attr(key).and_then(|v| v.trim().parse().ok())
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// All child elements with the given qualified name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    /// First descendant (depth-first) with the given qualified name.
    pub fn descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in self.elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated character data of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }
}

/// The stored form of a name: the known prefix for its namespace, or the
/// name as written.
fn canonical_name(name: QName<'_>, ns: ResolveResult<'_>) -> String {
    if let ResolveResult::Bound(uri) = ns {
        let known = KNOWN_NAMESPACES
            .iter()
            .find(|(known, _)| known.as_bytes() == uri.as_ref());
        if let Some((_, prefix)) = known {
            let local = String::from_utf8_lossy(name.local_name().as_ref()).into_owned();
            return format!("{}:{}", prefix, local);
        }
    }
    String::from_utf8_lossy(name.as_ref()).into_owned()
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
