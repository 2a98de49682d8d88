//! Font table parsing and embedded font deobfuscation.
//!
//! Embedded fonts are stored obfuscated: the first 32 bytes of the font file
//! are XORed with a key derived from the GUID recorded in the font table
//! (`w:fontKey`). The operation is its own inverse.

use crate::error::{Error, Result};
use crate::model::{EmbeddedFont, FontCatalog, FontDeclaration, FontVariant};
use crate::xml::XmlElement;

/// Number of leading bytes covered by the obfuscation.
const OBFUSCATED_LEN: usize = 32;

/// Parse the font table from XML content.
pub fn parse_font_table(xml: &str) -> Result<FontCatalog> {
    if xml.trim().is_empty() {
        return Ok(FontCatalog::default());
    }
    let root = XmlElement::parse(xml)?;
    Ok(parse_font_table_tree(&root))
}

/// Build the font catalog from a parsed `w:fonts` element.
pub fn parse_font_table_tree(root: &XmlElement) -> FontCatalog {
    let mut catalog = FontCatalog::default();

    for el in root.children_named("w:font") {
        let Some(name) = el.attr("w:name") else {
            continue;
        };
        let mut font = FontDeclaration {
            name: name.to_string(),
            ..Default::default()
        };

        for child in el.elements() {
            match child.name.as_str() {
                "w:altName" => {
                    if let Some(alt) = child.val() {
                        font.alt_names.extend(
                            alt.split(',')
                                .map(str::trim)
                                .filter(|s| !s.is_empty())
                                .map(String::from),
                        );
                    }
                }
                "w:family" => font.family = child.val().map(String::from),
                _ => {
                    if let Some(variant) = FontVariant::from_embed_name(child.local_name()) {
                        if let Some(rel_id) = child.attr("r:id").or_else(|| child.attr_local("id")) {
                            font.embeds.push(EmbeddedFont {
                                variant,
                                rel_id: rel_id.to_string(),
                                key: child.attr("w:fontKey").map(String::from),
                            });
                        }
                    }
                }
            }
        }

        catalog.insert(font);
    }

    catalog
}

/// Derive the 16-byte XOR key from a font key GUID.
///
/// Braces and dashes are ignored; the remaining 32 hex digits are read as
/// bytes in reverse order.
pub fn parse_font_key(guid: &str) -> Result<[u8; 16]> {
    let hex: String = guid
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '-'))
        .collect();
    if hex.len() != 32 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidData(format!("malformed font key: {}", guid)));
    }

    let mut key = [0u8; 16];
    for i in 0..16 {
        let byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|e| Error::InvalidData(e.to_string()))?;
        key[15 - i] = byte;
    }
    Ok(key)
}

/// XOR the obfuscated header of an embedded font with its key.
///
/// Applying this twice with the same key returns the original bytes.
pub fn deobfuscate(mut data: Vec<u8>, guid: &str) -> Result<Vec<u8>> {
    let key = parse_font_key(guid)?;
    if data.len() < OBFUSCATED_LEN {
        return Err(Error::InvalidData(format!(
            "embedded font too short: {} bytes",
            data.len()
        )));
    }
    for (i, byte) in data.iter_mut().take(OBFUSCATED_LEN).enumerate() {
        *byte ^= key[i % 16];
    }
    Ok(data)
}

/// Check for a TrueType, OpenType or collection signature.
///
/// A wrong key leaves the header scrambled, so this is how a deobfuscation
/// with the wrong GUID is told apart from a usable font.
pub fn has_font_signature(data: &[u8]) -> bool {
    matches!(
        data.get(..4),
        Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf")
    )
}

/// Deobfuscate and verify an embedded font.
pub fn decode_embedded_font(data: Vec<u8>, guid: &str) -> Result<Vec<u8>> {
    let font = deobfuscate(data, guid)?;
    if !has_font_signature(&font) {
        return Err(Error::InvalidData(
            "embedded font has no font signature after deobfuscation".to_string(),
        ));
    }
    Ok(font)
}
