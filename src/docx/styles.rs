//! DOCX styles parsing.

use super::properties;
use crate::error::Result;
use crate::model::{
    DocDefaults, NumberingRef, StyleCatalog, StyleDefinition, StyleLayers, StyleType,
    TableCondition,
};
use crate::units::convert_boolean;
use crate::xml::XmlElement;

/// Parse styles from XML content.
pub fn parse_styles(xml: &str) -> Result<StyleCatalog> {
    // Handle empty content
    if xml.trim().is_empty() {
        return Ok(StyleCatalog::default());
    }
    let root = XmlElement::parse(xml)?;
    Ok(parse_styles_tree(&root))
}

/// Build the style catalog from a parsed `w:styles` element.
pub fn parse_styles_tree(root: &XmlElement) -> StyleCatalog {
    let mut catalog = StyleCatalog::default();

    for el in root.elements() {
        match el.name.as_str() {
            "w:docDefaults" => catalog.defaults = parse_doc_defaults(el),
            "w:style" => {
                if let Some(style) = parse_style(el) {
                    catalog.insert(style);
                }
            }
            _ => {}
        }
    }

    catalog
}

fn parse_doc_defaults(el: &XmlElement) -> DocDefaults {
    let mut defaults = DocDefaults::default();
    if let Some(rpr) = el.child("w:rPrDefault").and_then(|d| d.child("w:rPr")) {
        properties::run_css(rpr, &mut defaults.run);
    }
    if let Some(ppr) = el.child("w:pPrDefault").and_then(|d| d.child("w:pPr")) {
        properties::paragraph_css(ppr, &mut defaults.paragraph);
    }
    defaults
}

/// Formatting layers of a `w:style` or `w:tblStylePr`.
fn parse_layers(el: &XmlElement) -> StyleLayers {
    let mut layers = StyleLayers::default();
    for child in el.elements() {
        match child.name.as_str() {
            "w:pPr" => properties::paragraph_css(child, &mut layers.paragraph),
            "w:rPr" => properties::run_css(child, &mut layers.run),
            "w:tblPr" => properties::table_css(child, &mut layers.table, &mut layers.cell),
            "w:trPr" => properties::row_css(child, &mut layers.row),
            "w:tcPr" => properties::cell_css(child, &mut layers.cell),
            _ => {}
        }
    }
    layers
}

/// Parse a `w:numPr` element into a numbering reference.
///
/// A style may carry only `w:numId`; the level then defaults to 0.
pub fn parse_num_pr(num_pr: &XmlElement) -> Option<NumberingRef> {
    let id = num_pr.child("w:numId")?.val()?.to_string();
    let level = num_pr
        .child("w:ilvl")
        .and_then(|l| l.val())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);
    Some(NumberingRef { id, level })
}

fn parse_style(el: &XmlElement) -> Option<StyleDefinition> {
    let id = el.attr("w:styleId")?.to_string();
    let mut style = StyleDefinition {
        id,
        style_type: el.attr("w:type").and_then(StyleType::parse),
        is_default: convert_boolean(el.attr("w:default"), false),
        is_custom: convert_boolean(el.attr("w:customStyle"), false),
        layers: parse_layers(el),
        ..Default::default()
    };

    for child in el.elements() {
        match child.name.as_str() {
            "w:name" => style.name = child.val().map(String::from),
            "w:basedOn" => style.based_on = child.val().map(String::from),
            "w:link" => style.linked = child.val().map(String::from),
            "w:next" => style.next = child.val().map(String::from),
            "w:pPr" => {
                style.numbering = child.child("w:numPr").and_then(parse_num_pr);
                style.outline_level = child
                    .child("w:outlineLvl")
                    .and_then(|o| o.val())
                    .and_then(|v| v.parse::<u8>().ok())
                    // level 9 is "body text"
                    .filter(|l| *l < 9);
            }
            "w:tblStylePr" => {
                if let Some(condition) = child.attr("w:type").and_then(TableCondition::parse) {
                    style.conditions.insert(condition, parse_layers(child));
                }
            }
            _ => {}
        }
    }

    Some(style)
}
