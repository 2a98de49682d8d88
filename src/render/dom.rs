//! A small owned HTML tree and the containers rendered output is written to.

use crate::model::CssProps;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "col", "img", "wbr", "hr", "meta", "link"];

/// Elements whose text content is written unescaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

/// A node of the output tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(HtmlElement),
    Text(String),
    /// Placeholder for a resource resolved after the tree walk
    Slot(usize),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&HtmlElement> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Replace every slot in the subtree.
    ///
    /// `resolve` returns the node a slot stands for, or `None` to drop it.
    pub fn resolve_slots(nodes: &mut Vec<Node>, resolve: &mut dyn FnMut(usize) -> Option<Node>) {
        let mut i = 0;
        while i < nodes.len() {
            match &mut nodes[i] {
                Node::Slot(id) => {
                    let id = *id;
                    match resolve(id) {
                        Some(node) => {
                            nodes[i] = node;
                            i += 1;
                        }
                        None => {
                            nodes.remove(i);
                        }
                    }
                }
                Node::Element(el) => {
                    Self::resolve_slots(&mut el.children, resolve);
                    i += 1;
                }
                Node::Text(_) => i += 1,
            }
        }
    }

    /// Serialize to HTML.
    pub fn write_html(&self, out: &mut String) {
        self.write(out, false);
    }

    fn write(&self, out: &mut String, raw_text: bool) {
        match self {
            Node::Text(text) if raw_text => escape_raw_text(text, out),
            Node::Text(text) => escape_text(text, out),
            Node::Element(el) => el.write(out),
            Node::Slot(_) => {}
        }
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
            Node::Slot(_) => {}
        }
    }
}

impl From<HtmlElement> for Node {
    fn from(el: HtmlElement) -> Self {
        Node::Element(el)
    }
}

/// An HTML (or embedded SVG/MathML) element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlElement {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder form of [`HtmlElement::set_attr`].
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute, replacing an existing value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append a class to the `class` attribute.
    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() {
            return;
        }
        match self.attrs.iter_mut().find(|(k, _)| k == "class") {
            Some((_, existing)) if existing.split(' ').any(|c| c == class) => {}
            Some((_, existing)) if existing.is_empty() => existing.push_str(class),
            Some((_, existing)) => {
                existing.push(' ');
                existing.push_str(class);
            }
            None => self.attrs.push(("class".to_string(), class.to_string())),
        }
    }

    /// Builder form of [`HtmlElement::add_class`].
    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split(' ').any(|x| x == class))
            .unwrap_or(false)
    }

    /// Set the inline `style` attribute; empty properties leave it unset.
    pub fn set_style(&mut self, css: &CssProps) {
        if !css.is_empty() {
            self.set_attr("style", css.to_inline());
        }
    }

    /// Builder form of [`HtmlElement::set_style`].
    pub fn style(mut self, css: &CssProps) -> Self {
        self.set_style(css);
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Builder form of [`HtmlElement::push`].
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.push(node);
        self
    }

    /// Append a text node.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn extend(&mut self, nodes: impl IntoIterator<Item = Node>) {
        self.children.extend(nodes);
    }

    /// Serialize to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_attr(value, out);
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        let raw = RAW_TEXT_ELEMENTS.contains(&self.tag.as_str());
        for child in &self.children {
            child.write(out, raw);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

/// `style`/`script` content: only an end-tag opener can break out of it.
fn escape_raw_text(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(pos) = rest.find("</") {
        out.push_str(&rest[..pos]);
        out.push_str("<\\/");
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
}

fn escape_attr(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// An output target for rendered nodes.
///
/// Renderers only write into a container after a conversion has fully
/// succeeded, so a failed conversion leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlContainer {
    nodes: Vec<Node>,
}

impl HtmlContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, nodes: impl IntoIterator<Item = Node>) {
        self.nodes.extend(nodes);
    }

    /// Insert nodes before the current content.
    pub fn prepend(&mut self, nodes: Vec<Node>) {
        self.nodes.splice(0..0, nodes);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Serialize the content to an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out
    }
}
