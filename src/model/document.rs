//! Loaded document structures.

use super::{Element, ElementKind, FontCatalog, NumberingCatalog, Settings, StyleCatalog, Theme};
use crate::container::{OoxmlContainer, Relationships};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Document metadata extracted from docProps/core.xml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Document author/creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Document subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Document description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Keywords/tags
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keywords: Vec<String>,

    /// Creation date (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// Last modification date (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,

    /// Last modified by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
}

/// One parsed XML part: its element tree and its own relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPart {
    /// Package path of the part (e.g. `word/header1.xml`)
    pub path: String,
    pub root: Element,
    #[serde(default)]
    pub relationships: Relationships,
}

impl DocumentPart {
    pub fn new(path: impl Into<String>, root: Element, relationships: Relationships) -> Self {
        Self {
            path: path.into(),
            root,
            relationships,
        }
    }

    /// Package path a relationship of this part points at.
    ///
    /// `None` for unknown ids and external targets.
    pub fn resolve_target(&self, rel_id: &str) -> Option<String> {
        let rel = self.relationships.get(rel_id)?;
        if rel.external {
            return None;
        }
        Some(OoxmlContainer::resolve_path(&self.path, &rel.target))
    }

    /// External URL of a relationship (hyperlinks).
    pub fn external_target(&self, rel_id: &str) -> Option<&str> {
        let rel = self.relationships.get(rel_id)?;
        rel.external.then_some(rel.target.as_str())
    }

    /// Top-level children of the part's root element.
    pub fn children(&self) -> &[Element] {
        &self.root.children
    }
}

/// A fully loaded word-processing document.
///
/// Built once per conversion by [`crate::docx::DocxParser`] and treated as
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDocument {
    /// Document metadata
    pub metadata: Metadata,

    /// The main document part
    pub body: DocumentPart,

    #[serde(default)]
    pub styles: StyleCatalog,

    #[serde(default)]
    pub numbering: NumberingCatalog,

    #[serde(default)]
    pub fonts: FontCatalog,

    /// Path and relationships of the font table part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_table: Option<(String, Relationships)>,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub settings: Settings,

    /// Header parts keyed by the main document's relationship id
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, DocumentPart>,

    /// Footer parts keyed by the main document's relationship id
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub footers: HashMap<String, DocumentPart>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footnotes: Option<DocumentPart>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endnotes: Option<DocumentPart>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<DocumentPart>,

    /// Non-fatal problems met while loading
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl WordDocument {
    /// Create a document around a main part with every optional part absent.
    pub fn new(body: DocumentPart) -> Self {
        Self {
            metadata: Metadata::default(),
            body,
            styles: StyleCatalog::default(),
            numbering: NumberingCatalog::default(),
            fonts: FontCatalog::default(),
            font_table: None,
            theme: Theme::default(),
            settings: Settings::default(),
            headers: HashMap::new(),
            footers: HashMap::new(),
            footnotes: None,
            endnotes: None,
            comments: None,
            warnings: Vec::new(),
        }
    }

    /// Find a footnote body by id.
    pub fn footnote(&self, id: &str) -> Option<&Element> {
        find_note(self.footnotes.as_ref()?, id)
    }

    /// Find an endnote body by id.
    pub fn endnote(&self, id: &str) -> Option<&Element> {
        find_note(self.endnotes.as_ref()?, id)
    }

    /// Find a comment body by id.
    pub fn comment(&self, id: &str) -> Option<&Element> {
        self.comments.as_ref()?.children().iter().find(|c| {
            matches!(&c.kind, ElementKind::Comment(info) if info.id == id)
        })
    }

    /// Extract the text of the main document.
    pub fn plain_text(&self) -> String {
        self.body.root.plain_text().trim_end().to_string()
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to JSON string (compact).
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn find_note<'a>(part: &'a DocumentPart, id: &str) -> Option<&'a Element> {
    part.children().iter().find(|n| match &n.kind {
        ElementKind::Footnote { id: note_id } | ElementKind::Endnote { id: note_id } => note_id == id,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Relationship;
    use crate::model::ParagraphProps;

    fn doc_with_text(text: &str) -> WordDocument {
        let para = Element::with_children(
            ElementKind::Paragraph(ParagraphProps::default()),
            vec![Element::text_run(text)],
        );
        let root = Element::with_children(ElementKind::Document { section: None }, vec![para]);
        WordDocument::new(DocumentPart::new("word/document.xml", root, Relationships::new()))
    }

    #[test]
    fn test_plain_text_extraction() {
        let doc = doc_with_text("Hello, World!");
        assert_eq!(doc.plain_text(), "Hello, World!");
    }

    #[test]
    fn test_resolve_target() {
        let mut rels = Relationships::new();
        rels.add(Relationship {
            id: "rId5".to_string(),
            rel_type: "image".to_string(),
            target: "media/image1.png".to_string(),
            external: false,
        });
        rels.add(Relationship {
            id: "rId6".to_string(),
            rel_type: "hyperlink".to_string(),
            target: "https://example.com".to_string(),
            external: true,
        });
        let part = DocumentPart::new(
            "word/document.xml",
            Element::new(ElementKind::Document { section: None }),
            rels,
        );

        assert_eq!(part.resolve_target("rId5").unwrap(), "word/media/image1.png");
        assert!(part.resolve_target("rId6").is_none());
        assert_eq!(part.external_target("rId6"), Some("https://example.com"));
        assert!(part.resolve_target("rId404").is_none());
    }

    #[test]
    fn test_metadata_serialization() {
        let meta = Metadata {
            title: Some("Test Document".to_string()),
            author: Some("Test Author".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("Test Document"));
        assert!(json.contains("Test Author"));
        // Empty fields should not be serialized
        assert!(!json.contains("subject"));
    }

    #[test]
    fn test_document_json() {
        let doc = doc_with_text("Hi");
        let json = doc.to_json_compact().unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"type\":\"paragraph\""));
        let back: WordDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.plain_text(), "Hi");
    }
}
