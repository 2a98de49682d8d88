//! `@font-face` rules for embedded fonts.

use super::dom::Node;
use super::options::Options;
use super::resources::{ResourceKind, Resources};
use crate::docx::font_part_path;
use crate::model::WordDocument;

/// Register one font resource per embedded face and return their slots.
///
/// Each slot resolves to an `@font-face` rule; faces whose part is missing
/// or whose key does not decode drop out at resolution.
pub fn font_faces(doc: &WordDocument, options: &Options, resources: &mut Resources) -> Vec<Node> {
    if options.ignore_fonts {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for font in doc.fonts.embedded() {
        for embed in &font.embeds {
            let path = match font_part_path(doc, embed) {
                Ok(path) => path,
                Err(err) => {
                    if options.debug {
                        log::debug!("font {} skipped: {}", font.name, err);
                    }
                    continue;
                }
            };
            slots.push(resources.add(ResourceKind::Font {
                family: font.name.clone(),
                variant: embed.variant,
                path,
                key: embed.key.clone(),
            }));
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Relationship, Relationships};
    use crate::model::{
        DocumentPart, Element, ElementKind, EmbeddedFont, FontDeclaration, FontVariant,
    };

    fn document() -> WordDocument {
        let body = DocumentPart::new(
            "word/document.xml",
            Element::new(ElementKind::Document { section: None }),
            Relationships::new(),
        );
        let mut doc = WordDocument::new(body);
        doc.fonts.insert(FontDeclaration {
            name: "Fancy".to_string(),
            embeds: vec![
                EmbeddedFont {
                    variant: FontVariant::Regular,
                    rel_id: "rId1".to_string(),
                    key: Some("{0E2A3BE1-6F4C-4D24-9C7F-1A2B3C4D5E6F}".to_string()),
                },
                EmbeddedFont {
                    variant: FontVariant::Bold,
                    rel_id: "rId404".to_string(),
                    key: None,
                },
            ],
            ..Default::default()
        });
        let mut rels = Relationships::new();
        rels.add(Relationship {
            id: "rId1".to_string(),
            rel_type: "http://schemas.openxmlformats.org/officeDocument/2006/relationships/font"
                .to_string(),
            target: "fonts/font1.odttf".to_string(),
            external: false,
        });
        doc.font_table = Some(("word/fontTable.xml".to_string(), rels));
        doc
    }

    #[test]
    fn test_one_slot_per_resolvable_face() {
        let doc = document();
        let mut resources = Resources::new();
        let slots = font_faces(&doc, &Options::default(), &mut resources);
        assert_eq!(slots, vec![Node::Slot(0)]);
        assert_eq!(resources.pending()[0].path(), "word/fonts/font1.odttf");
    }

    #[test]
    fn test_ignore_fonts() {
        let doc = document();
        let mut resources = Resources::new();
        let options = Options::default().with_ignore_fonts(true);
        assert!(font_faces(&doc, &options, &mut resources).is_empty());
        assert!(resources.is_empty());
    }
}
