//! Package detection for word-processing documents.

use crate::container::{decode_xml_bytes, OoxmlContainer};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Main part content types, most common first.
const MAIN_CONTENT_TYPES: [(&str, DocumentKind); 4] = [
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        DocumentKind::Document,
    ),
    (
        "application/vnd.ms-word.document.macroEnabled.main+xml",
        DocumentKind::MacroEnabled,
    ),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml",
        DocumentKind::Template,
    ),
    (
        "application/vnd.ms-word.template.macroEnabledTemplate.main+xml",
        DocumentKind::MacroEnabledTemplate,
    ),
];

/// Relationship type suffix of the package's main part.
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// Default location of the main document part.
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Flavour of word-processing package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// .docx
    Document,
    /// .docm
    MacroEnabled,
    /// .dotx
    Template,
    /// .dotm
    MacroEnabledTemplate,
}

impl DocumentKind {
    /// Returns the file extension for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Document => "docx",
            DocumentKind::MacroEnabled => "docm",
            DocumentKind::Template => "dotx",
            DocumentKind::MacroEnabledTemplate => "dotm",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Detect the package kind from a file path.
pub fn detect_from_path(path: impl AsRef<Path>) -> Result<DocumentKind> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    detect_from_reader(reader)
}

/// Detect the package kind from a byte slice.
///
/// # Example
///
/// ```no_run
/// use dochtml::detect::detect_from_bytes;
///
/// let data = std::fs::read("document.docx")?;
/// let kind = detect_from_bytes(&data)?;
/// # Ok::<(), dochtml::Error>(())
/// ```
pub fn detect_from_bytes(data: &[u8]) -> Result<DocumentKind> {
    if !is_zip_file(data) {
        return Err(Error::ZipArchive("not a ZIP archive".to_string()));
    }

    let cursor = std::io::Cursor::new(data);
    detect_from_reader(cursor)
}

/// Detect the package kind from a reader.
pub fn detect_from_reader<R: Read + Seek>(reader: R) -> Result<DocumentKind> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            Some(decode_xml_bytes(&bytes)?)
        }
        Err(_) => None,
    };

    if let Some(content_types) = content_types {
        for (content_type, kind) in MAIN_CONTENT_TYPES {
            if content_types.contains(content_type) {
                return Ok(kind);
            }
        }
    }

    // Fallback: a conventional main part without a usable content type
    if archive.file_names().any(|n| n == DEFAULT_MAIN_PART) {
        Ok(DocumentKind::Document)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Locate the main document part of an opened package.
///
/// Follows the package-level `officeDocument` relationship and falls back to
/// `word/document.xml`.
pub fn main_document_path(container: &OoxmlContainer) -> Result<String> {
    let rels = container.read_package_relationships()?;
    if let Some(rel) = rels.find_by_type_suffix(OFFICE_DOCUMENT_REL) {
        let path = rel.target.trim_start_matches('/').to_string();
        if container.exists(&path) {
            return Ok(path);
        }
    }

    if container.exists(DEFAULT_MAIN_PART) {
        Ok(DEFAULT_MAIN_PART.to_string())
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
            for (name, data) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_kind_extension() {
        assert_eq!(DocumentKind::Document.extension(), "docx");
        assert_eq!(DocumentKind::MacroEnabledTemplate.to_string(), "dotm");
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B])); // Too short
    }

    #[test]
    fn test_detect_invalid_data() {
        let result = detect_from_bytes(&[0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(result, Err(Error::ZipArchive(_))));
    }

    #[test]
    fn test_detect_by_content_type() {
        let data = build_zip(&[(
            "[Content_Types].xml",
            r#"<Types><Override PartName="/word/document.xml" ContentType="application/vnd.ms-word.document.macroEnabled.main+xml"/></Types>"#,
        )]);
        assert_eq!(detect_from_bytes(&data).unwrap(), DocumentKind::MacroEnabled);
    }

    #[test]
    fn test_archive_without_document() {
        let data = build_zip(&[("xl/workbook.xml", "<workbook/>")]);
        assert!(matches!(detect_from_bytes(&data), Err(Error::UnknownFormat)));

        let data = build_zip(&[("word/document.xml", "<w:document/>")]);
        assert_eq!(detect_from_bytes(&data).unwrap(), DocumentKind::Document);
    }

    #[test]
    fn test_main_document_path() {
        let data = build_zip(&[
            (
                "_rels/.rels",
                r#"<Relationships><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/word/main.xml"/></Relationships>"#,
            ),
            ("word/main.xml", "<w:document/>"),
        ]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert_eq!(main_document_path(&container).unwrap(), "word/main.xml");

        let data = build_zip(&[("word/other.xml", "<w:document/>")]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert!(matches!(main_document_path(&container), Err(Error::UnknownFormat)));
    }
}
