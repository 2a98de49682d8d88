//! DOCX numbering (list) parsing.

use super::properties;
use crate::error::Result;
use crate::model::{
    AbstractNumbering, LevelOverride, LevelSuffix, NumberingCatalog, NumberingInstance,
    NumberingLevel, StyleCatalog, StyleType,
};
use crate::units::convert_boolean;
use crate::xml::XmlElement;

/// Parse numbering from XML content.
pub fn parse_numbering(xml: &str) -> Result<NumberingCatalog> {
    if xml.trim().is_empty() {
        return Ok(NumberingCatalog::default());
    }
    let root = XmlElement::parse(xml)?;
    Ok(parse_numbering_tree(&root))
}

/// Build the numbering catalog from a parsed `w:numbering` element.
pub fn parse_numbering_tree(root: &XmlElement) -> NumberingCatalog {
    let mut catalog = NumberingCatalog::default();

    for el in root.elements() {
        match el.name.as_str() {
            "w:abstractNum" => {
                if let Some(id) = el.attr("w:abstractNumId") {
                    let abstract_num = parse_abstract(id, el);
                    catalog.abstracts.insert(abstract_num.id.clone(), abstract_num);
                }
            }
            "w:num" => {
                if let Some(instance) = parse_instance(el) {
                    catalog.instances.insert(instance.id.clone(), instance);
                }
            }
            "w:numPicBullet" => {
                let id = el.attr("w:numPicBulletId");
                let rel = el
                    .descendant("v:imagedata")
                    .and_then(|img| img.attr("r:id").or_else(|| img.attr_local("id")))
                    .or_else(|| {
                        el.descendant("a:blip")
                            .and_then(|blip| blip.attr("r:embed"))
                    });
                if let (Some(id), Some(rel)) = (id, rel) {
                    catalog.picture_bullets.insert(id.to_string(), rel.to_string());
                }
            }
            _ => {}
        }
    }

    catalog
}

fn parse_abstract(id: &str, el: &XmlElement) -> AbstractNumbering {
    let mut abstract_num = AbstractNumbering {
        id: id.to_string(),
        ..Default::default()
    };

    for child in el.elements() {
        match child.name.as_str() {
            "w:lvl" => {
                if let Some(level) = parse_level(child) {
                    abstract_num.levels.push(level);
                }
            }
            "w:styleLink" => abstract_num.style_link = child.val().map(String::from),
            "w:numStyleLink" => abstract_num.num_style_link = child.val().map(String::from),
            _ => {}
        }
    }

    abstract_num.levels.sort_by_key(|l| l.level);
    abstract_num
}

/// Parse a `w:lvl` element.
pub fn parse_level(el: &XmlElement) -> Option<NumberingLevel> {
    let index: u8 = el.attr("w:ilvl")?.trim().parse().ok()?;
    let mut level = NumberingLevel::new(index);

    for child in el.elements() {
        match child.name.as_str() {
            "w:start" => {
                if let Some(start) = child.val().and_then(|v| v.trim().parse().ok()) {
                    level.start = start;
                }
            }
            "w:numFmt" => {
                if let Some(fmt) = child.val() {
                    level.format = fmt.to_string();
                }
            }
            "w:lvlText" => level.text = child.val().unwrap_or_default().to_string(),
            "w:suff" => level.suffix = child.val().map(LevelSuffix::parse).unwrap_or_default(),
            "w:lvlJc" => level.justification = child.val().map(String::from),
            "w:lvlRestart" => level.restart = child.val().and_then(|v| v.trim().parse().ok()),
            "w:isLgl" => level.legal = convert_boolean(child.val(), true),
            "w:lvlPicBulletId" => level.picture_bullet = child.val().map(String::from),
            "w:pPr" => properties::paragraph_css(child, &mut level.paragraph),
            "w:rPr" => properties::run_css(child, &mut level.run),
            _ => {}
        }
    }

    Some(level)
}

fn parse_instance(el: &XmlElement) -> Option<NumberingInstance> {
    let id = el.attr("w:numId")?.to_string();
    let abstract_id = el.child("w:abstractNumId")?.val()?.to_string();
    let mut instance = NumberingInstance {
        id,
        abstract_id,
        ..Default::default()
    };

    for ov in el.children_named("w:lvlOverride") {
        let Some(index) = ov.attr("w:ilvl").and_then(|v| v.trim().parse::<u8>().ok()) else {
            continue;
        };
        let level_override = LevelOverride {
            start: ov
                .child("w:startOverride")
                .and_then(|s| s.val())
                .and_then(|v| v.trim().parse().ok()),
            level: ov.child("w:lvl").and_then(parse_level),
        };
        instance.overrides.insert(index, level_override);
    }

    Some(instance)
}

/// Record which instance each numbering style points at, so
/// `w:numStyleLink` can be resolved through the style catalog.
pub fn link_numbering_styles(numbering: &mut NumberingCatalog, styles: &StyleCatalog) {
    for style in styles.styles.values() {
        if style.style_type != Some(StyleType::Numbering) {
            continue;
        }
        if let Some(num) = &style.numbering {
            numbering
                .style_numbering
                .insert(style.id.clone(), num.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NumberingCounters, NumberingRef, StyleDefinition};

    const NUMBERING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:numPicBullet w:numPicBulletId="0">
        <w:pict><v:shape><v:imagedata r:id="rId1"/></v:shape></w:pict>
    </w:numPicBullet>
    <w:abstractNum w:abstractNumId="0">
        <w:lvl w:ilvl="1">
            <w:start w:val="1"/>
            <w:numFmt w:val="bullet"/>
            <w:lvlText w:val="o"/>
            <w:suff w:val="space"/>
        </w:lvl>
        <w:lvl w:ilvl="0">
            <w:start w:val="3"/>
            <w:numFmt w:val="upperRoman"/>
            <w:lvlText w:val="%1."/>
            <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>
        </w:lvl>
    </w:abstractNum>
    <w:abstractNum w:abstractNumId="1">
        <w:numStyleLink w:val="OutlineList"/>
    </w:abstractNum>
    <w:abstractNum w:abstractNumId="2">
        <w:styleLink w:val="OutlineList"/>
        <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/><w:lvlText w:val="(%1)"/></w:lvl>
    </w:abstractNum>
    <w:num w:numId="1">
        <w:abstractNumId w:val="0"/>
    </w:num>
    <w:num w:numId="2">
        <w:abstractNumId w:val="0"/>
        <w:lvlOverride w:ilvl="0"><w:startOverride w:val="10"/></w:lvlOverride>
    </w:num>
    <w:num w:numId="3">
        <w:abstractNumId w:val="1"/>
    </w:num>
</w:numbering>"#;

    #[test]
    fn test_parse_numbering() {
        let catalog = parse_numbering(NUMBERING).unwrap();

        assert_eq!(catalog.abstracts.len(), 3);
        assert_eq!(catalog.instances.len(), 3);
        assert_eq!(catalog.picture_bullets.get("0").map(String::as_str), Some("rId1"));

        let abstract_num = &catalog.abstracts["0"];
        assert_eq!(abstract_num.levels.len(), 2);
        // sorted by level index
        assert_eq!(abstract_num.levels[0].format, "upperRoman");
        assert_eq!(abstract_num.levels[0].start, 3);
        assert_eq!(abstract_num.levels[0].paragraph.get("margin-left"), Some("36.00pt"));
        assert_eq!(abstract_num.levels[1].suffix, LevelSuffix::Space);

        assert_eq!(catalog.start_override("2", 0), Some(10));
    }

    #[test]
    fn test_markers_from_parsed_catalog() {
        let catalog = parse_numbering(NUMBERING).unwrap();
        let mut counters = NumberingCounters::new();
        assert_eq!(counters.next_marker(&catalog, "1", 0).unwrap(), "III.");
        assert_eq!(counters.next_marker(&catalog, "1", 1).unwrap(), "o");
        assert_eq!(counters.next_marker(&catalog, "2", 0).unwrap(), "X.");
    }

    #[test]
    fn test_num_style_link() {
        let catalog = parse_numbering(NUMBERING).unwrap();
        // abstract 1 borrows the levels of the abstract defining OutlineList
        let resolved = catalog.abstract_for("3").unwrap();
        assert_eq!(resolved.id, "2");
        assert_eq!(catalog.level("3", 0).unwrap().text, "(%1)");
    }

    #[test]
    fn test_link_numbering_styles() {
        let mut catalog = parse_numbering(NUMBERING).unwrap();
        let mut styles = StyleCatalog::default();
        styles.insert(StyleDefinition {
            id: "OutlineList".into(),
            style_type: Some(StyleType::Numbering),
            numbering: Some(NumberingRef {
                id: "1".into(),
                level: 0,
            }),
            ..Default::default()
        });
        link_numbering_styles(&mut catalog, &styles);
        assert_eq!(
            catalog.style_numbering.get("OutlineList").map(String::as_str),
            Some("1")
        );
    }
}
