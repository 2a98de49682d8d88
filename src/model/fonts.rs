//! Font table catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which face of a family an embedded font provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontVariant {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    /// Parse the local name of an embed element (`embedRegular`, ...).
    pub fn from_embed_name(local_name: &str) -> Option<Self> {
        match local_name {
            "embedRegular" => Some(FontVariant::Regular),
            "embedBold" => Some(FontVariant::Bold),
            "embedItalic" => Some(FontVariant::Italic),
            "embedBoldItalic" => Some(FontVariant::BoldItalic),
            _ => None,
        }
    }

    /// CSS `font-weight` for this face.
    pub fn css_weight(self) -> &'static str {
        match self {
            FontVariant::Bold | FontVariant::BoldItalic => "bold",
            _ => "normal",
        }
    }

    /// CSS `font-style` for this face.
    pub fn css_style(self) -> &'static str {
        match self {
            FontVariant::Italic | FontVariant::BoldItalic => "italic",
            _ => "normal",
        }
    }
}

/// An embedded, obfuscated font resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedFont {
    pub variant: FontVariant,
    /// Relationship id in the font table's relationships
    pub rel_id: String,
    /// Obfuscation key GUID (`w:fontKey`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// A `w:font` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_names: Vec<String>,
    /// `w:family` (roman, swiss, modern, script, decorative, auto)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<EmbeddedFont>,
}

impl FontDeclaration {
    /// Generic CSS family matching the declared family class.
    pub fn generic_family(&self) -> Option<&'static str> {
        match self.family.as_deref()? {
            "roman" => Some("serif"),
            "swiss" => Some("sans-serif"),
            "modern" => Some("monospace"),
            "script" => Some("cursive"),
            "decorative" => Some("fantasy"),
            _ => None,
        }
    }
}

/// Fonts declared in `word/fontTable.xml`, keyed by family name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontCatalog {
    pub fonts: HashMap<String, FontDeclaration>,
}

impl FontCatalog {
    pub fn insert(&mut self, font: FontDeclaration) {
        self.fonts.insert(font.name.clone(), font);
    }

    pub fn get(&self, name: &str) -> Option<&FontDeclaration> {
        self.fonts.get(name)
    }

    /// Declarations with at least one embedded face, sorted by name.
    pub fn embedded(&self) -> Vec<&FontDeclaration> {
        let mut fonts: Vec<_> = self.fonts.values().filter(|f| !f.embeds.is_empty()).collect();
        fonts.sort_by(|a, b| a.name.cmp(&b.name));
        fonts
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_css() {
        let v = FontVariant::from_embed_name("embedBoldItalic").unwrap();
        assert_eq!(v.css_weight(), "bold");
        assert_eq!(v.css_style(), "italic");
        assert!(FontVariant::from_embed_name("embedTrueTypeFonts").is_none());
    }

    #[test]
    fn test_embedded_listing() {
        let mut catalog = FontCatalog::default();
        catalog.insert(FontDeclaration {
            name: "Plain".into(),
            family: Some("swiss".into()),
            ..Default::default()
        });
        catalog.insert(FontDeclaration {
            name: "Fancy".into(),
            embeds: vec![EmbeddedFont {
                variant: FontVariant::Regular,
                rel_id: "rId1".into(),
                key: None,
            }],
            ..Default::default()
        });
        let embedded = catalog.embedded();
        assert_eq!(embedded.len(), 1);
        assert_eq!(embedded[0].name, "Fancy");
        assert_eq!(catalog.get("Plain").unwrap().generic_family(), Some("sans-serif"));
    }
}
