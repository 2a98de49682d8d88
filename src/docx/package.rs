//! Package loader: reads every part of a word-processing package into a
//! [`WordDocument`].

use super::fonts::{decode_embedded_font, parse_font_table_tree};
use super::numbering::{link_numbering_styles, parse_numbering_tree};
use super::parser::ContentParser;
use super::settings::parse_settings;
use super::styles::parse_styles_tree;
use super::theme::parse_theme;
use crate::container::{OoxmlContainer, Relationships};
use crate::detect;
use crate::error::{Error, Result};
use crate::model::{DocumentPart, EmbeddedFont, WordDocument};
use crate::xml::XmlElement;
use std::collections::HashMap;

/// Parser for DOCX (Word) packages.
pub struct DocxParser {
    container: OoxmlContainer,
    main_path: String,
    debug: bool,
}

impl DocxParser {
    /// Open a DOCX file for parsing.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a parser from bytes.
    ///
    /// Fails with [`Error::ZipArchive`] when the bytes are not an archive and
    /// [`Error::UnknownFormat`] when the archive has no main document part.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    /// Create a parser from an opened container.
    pub fn from_container(container: OoxmlContainer) -> Result<Self> {
        let main_path = detect::main_document_path(&container)?;
        Ok(Self {
            container,
            main_path,
            debug: false,
        })
    }

    /// Log non-fatal problems through the `log` facade.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The underlying package.
    pub fn container(&self) -> &OoxmlContainer {
        &self.container
    }

    /// Package path of the main document part.
    pub fn main_path(&self) -> &str {
        &self.main_path
    }

    /// Load the whole document.
    ///
    /// Only the main document part is required. Every other part that is
    /// missing or unreadable is left out and noted in
    /// [`WordDocument::warnings`].
    pub fn parse(&self) -> Result<WordDocument> {
        let mut warnings = Vec::new();
        let main_rels = self.relationships(&self.main_path, &mut warnings);

        let mut styles = self
            .optional_part(&main_rels, "/styles", &mut warnings)
            .map(|(_, root)| parse_styles_tree(&root))
            .unwrap_or_default();
        if let Err(err) = styles.validate() {
            let repaired = styles.break_cycles();
            warnings.push(format!("{}; cleared basedOn of {}", err, repaired.join(", ")));
        }

        let mut numbering = self
            .optional_part(&main_rels, "/numbering", &mut warnings)
            .map(|(_, root)| parse_numbering_tree(&root))
            .unwrap_or_default();
        link_numbering_styles(&mut numbering, &styles);

        let settings = self
            .optional_text(&main_rels, "/settings", &mut warnings)
            .and_then(|(path, xml)| note(parse_settings(&xml), &path, &mut warnings))
            .unwrap_or_default();

        let theme = self
            .optional_text(&main_rels, "/theme", &mut warnings)
            .and_then(|(path, xml)| note(parse_theme(&xml), &path, &mut warnings))
            .unwrap_or_default();

        let (fonts, font_table) = match self.optional_part(&main_rels, "/fontTable", &mut warnings) {
            Some((path, root)) => {
                let rels = self.relationships(&path, &mut warnings);
                (parse_font_table_tree(&root), Some((path, rels)))
            }
            None => Default::default(),
        };

        // The main document is the only fatal part
        let mut parser = ContentParser::new();
        let root = self.container.read_xml_tree(&self.main_path)?;
        let body_root = parser.parse_document(&root);
        let body = DocumentPart::new(self.main_path.clone(), body_root, main_rels);

        let headers = self.header_footer_parts(&body.relationships, "/header", &mut parser, &mut warnings);
        let footers = self.header_footer_parts(&body.relationships, "/footer", &mut parser, &mut warnings);

        let footnotes = self
            .optional_part(&body.relationships, "/footnotes", &mut warnings)
            .map(|(path, root)| {
                let rels = self.relationships(&path, &mut warnings);
                DocumentPart::new(path, parser.parse_notes(&root), rels)
            });
        let endnotes = self
            .optional_part(&body.relationships, "/endnotes", &mut warnings)
            .map(|(path, root)| {
                let rels = self.relationships(&path, &mut warnings);
                DocumentPart::new(path, parser.parse_notes(&root), rels)
            });
        let comments = self
            .optional_part(&body.relationships, "/comments", &mut warnings)
            .map(|(path, root)| {
                let rels = self.relationships(&path, &mut warnings);
                DocumentPart::new(path, parser.parse_comments(&root), rels)
            });

        let metadata = match self.container.parse_core_metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                warnings.push(format!("docProps/core.xml: {}", err));
                Default::default()
            }
        };

        warnings.extend(parser.take_warnings());
        if self.debug {
            for warning in &warnings {
                log::warn!("{}", warning);
            }
            log::debug!(
                "loaded {}: {} styles, {} headers, {} footers",
                self.main_path,
                styles.len(),
                headers.len(),
                footers.len()
            );
        }

        let mut doc = WordDocument::new(body);
        doc.metadata = metadata;
        doc.styles = styles;
        doc.numbering = numbering;
        doc.fonts = fonts;
        doc.font_table = font_table;
        doc.theme = theme;
        doc.settings = settings;
        doc.headers = headers;
        doc.footers = footers;
        doc.footnotes = footnotes;
        doc.endnotes = endnotes;
        doc.comments = comments;
        doc.warnings = warnings;
        Ok(doc)
    }

    /// Read and deobfuscate one embedded font.
    ///
    /// Fails when the font table has no relationship for the font, the part
    /// is missing, or the key is missing or does not yield a font.
    pub fn load_font(&self, doc: &WordDocument, embed: &EmbeddedFont) -> Result<Vec<u8>> {
        let path = font_part_path(doc, embed)?;
        let key = embed
            .key
            .as_deref()
            .ok_or_else(|| Error::InvalidData(format!("font {} has no key", path)))?;
        let data = self.container.read_binary(&path)?;
        decode_embedded_font(data, key)
    }

    /// Raw bytes of a package part.
    pub fn read_part(&self, path: &str) -> Result<Vec<u8>> {
        self.container.read_binary(path)
    }

    fn relationships(&self, path: &str, warnings: &mut Vec<String>) -> Relationships {
        match self.container.read_relationships(path) {
            Ok(rels) => rels,
            Err(err) => {
                warnings.push(format!("relationships of {}: {}", path, err));
                Relationships::new()
            }
        }
    }

    /// Path of the part a main-document relationship type points at.
    fn related_path(&self, rels: &Relationships, type_suffix: &str) -> Option<String> {
        let rel = rels.find_by_type_suffix(type_suffix)?;
        if rel.external {
            return None;
        }
        Some(OoxmlContainer::resolve_path(&self.main_path, &rel.target))
    }

    fn optional_text(
        &self,
        rels: &Relationships,
        type_suffix: &str,
        warnings: &mut Vec<String>,
    ) -> Option<(String, String)> {
        let path = self.related_path(rels, type_suffix)?;
        match self.container.read_xml(&path) {
            Ok(xml) => Some((path, xml)),
            Err(err) => {
                warnings.push(format!("{}: {}", path, err));
                None
            }
        }
    }

    fn optional_part(
        &self,
        rels: &Relationships,
        type_suffix: &str,
        warnings: &mut Vec<String>,
    ) -> Option<(String, XmlElement)> {
        let (path, xml) = self.optional_text(rels, type_suffix, warnings)?;
        let root = note(XmlElement::parse(&xml), &path, warnings)?;
        Some((path, root))
    }

    fn header_footer_parts(
        &self,
        rels: &Relationships,
        type_suffix: &str,
        parser: &mut ContentParser,
        warnings: &mut Vec<String>,
    ) -> HashMap<String, DocumentPart> {
        let mut parts = HashMap::new();
        for rel in rels.all_by_type_suffix(type_suffix) {
            if rel.external {
                continue;
            }
            let path = OoxmlContainer::resolve_path(&self.main_path, &rel.target);
            let root = match self.container.read_xml_tree(&path) {
                Ok(root) => root,
                Err(err) => {
                    warnings.push(format!("{}: {}", path, err));
                    continue;
                }
            };
            let part_rels = self.relationships(&path, warnings);
            let element = parser.parse_header_footer(&root);
            parts.insert(rel.id.clone(), DocumentPart::new(path, element, part_rels));
        }
        parts
    }
}

impl std::fmt::Debug for DocxParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocxParser")
            .field("main_path", &self.main_path)
            .field("container", &self.container)
            .finish()
    }
}

/// Package path of an embedded font part.
pub fn font_part_path(doc: &WordDocument, embed: &EmbeddedFont) -> Result<String> {
    let (table_path, rels) = doc
        .font_table
        .as_ref()
        .ok_or_else(|| Error::MissingComponent("word/fontTable.xml".to_string()))?;
    let rel = rels
        .get(&embed.rel_id)
        .ok_or_else(|| Error::ResourceNotFound(embed.rel_id.clone()))?;
    Ok(OoxmlContainer::resolve_path(table_path, &rel.target))
}

/// Turn a part parse failure into a warning.
fn note<T>(result: Result<T>, path: &str, warnings: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warnings.push(format!("{}: {}", path, err));
            None
        }
    }
}
