//! Section properties (`w:sectPr`) parsing.

use crate::model::{
    Columns, HeaderFooterKind, HeaderFooterRef, PageMargins, PageSize, SectionProperties,
};
use crate::units::{convert_boolean, convert_length, LengthUsage};
use crate::xml::XmlElement;

fn dxa(el: &XmlElement, attr: &str) -> Option<String> {
    el.attr(attr).and_then(|v| convert_length(v, LengthUsage::Dxa))
}

fn reference(el: &XmlElement) -> Option<HeaderFooterRef> {
    let rel_id = el.attr("r:id").or_else(|| el.attr_local("id"))?;
    Some(HeaderFooterRef {
        kind: HeaderFooterKind::parse(el.attr("w:type")),
        rel_id: rel_id.to_string(),
    })
}

/// Parse a `w:sectPr` element.
pub fn parse_section(sect: &XmlElement) -> SectionProperties {
    let mut props = SectionProperties::default();

    for el in sect.elements() {
        match el.name.as_str() {
            "w:pgSz" => {
                props.page_size = PageSize {
                    width: dxa(el, "w:w"),
                    height: dxa(el, "w:h"),
                    landscape: el.attr("w:orient") == Some("landscape"),
                };
            }
            "w:pgMar" => {
                props.margins = PageMargins {
                    top: dxa(el, "w:top"),
                    right: dxa(el, "w:right"),
                    bottom: dxa(el, "w:bottom"),
                    left: dxa(el, "w:left"),
                    header: dxa(el, "w:header"),
                    footer: dxa(el, "w:footer"),
                    gutter: dxa(el, "w:gutter"),
                };
            }
            "w:cols" => {
                let count = el
                    .attr_int("w:num")
                    .map(|n| n.max(1) as u32)
                    .unwrap_or_else(|| el.children_named("w:col").count().max(1) as u32);
                props.columns = Some(Columns {
                    count,
                    space: dxa(el, "w:space"),
                    separator: convert_boolean(el.attr("w:sep"), false),
                });
            }
            "w:headerReference" => props.headers.extend(reference(el)),
            "w:footerReference" => props.footers.extend(reference(el)),
            "w:titlePg" => props.title_page = convert_boolean(el.val(), true),
            "w:type" => props.section_type = el.val().map(String::from),
            "w:pgNumType" => {
                props.page_number_start = el.attr_int("w:start").and_then(|n| u32::try_from(n).ok());
            }
            _ => {}
        }
    }

    props
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section() {
        let xml = r#"<w:sectPr>
  <w:headerReference w:type="default" r:id="rId8"/>
  <w:headerReference w:type="first" r:id="rId9"/>
  <w:footerReference w:type="default" r:id="rId10"/>
  <w:type w:val="continuous"/>
  <w:pgSz w:w="11906" w:h="16838"/>
  <w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1800" w:header="708" w:footer="708" w:gutter="0"/>
  <w:pgNumType w:start="3"/>
  <w:cols w:num="2" w:space="720" w:sep="1"/>
  <w:titlePg/>
</w:sectPr>"#;
        let sect = parse_section(&XmlElement::parse(xml).unwrap());

        assert_eq!(sect.page_size.width.as_deref(), Some("595.30pt"));
        assert_eq!(sect.page_size.height.as_deref(), Some("841.90pt"));
        assert!(!sect.page_size.landscape);
        assert_eq!(sect.margins.left.as_deref(), Some("90.00pt"));
        assert_eq!(sect.margins.gutter.as_deref(), Some("0.00pt"));
        assert_eq!(sect.headers.len(), 2);
        assert_eq!(sect.header(HeaderFooterKind::First).unwrap().rel_id, "rId9");
        assert_eq!(sect.footers.len(), 1);
        assert!(sect.title_page);
        assert_eq!(sect.section_type.as_deref(), Some("continuous"));
        assert_eq!(sect.page_number_start, Some(3));
        let cols = sect.columns.unwrap();
        assert_eq!(cols.count, 2);
        assert!(cols.separator);
    }
}
