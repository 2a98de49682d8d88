//! Theme part (`word/theme/theme1.xml`) parsing.

use crate::error::Result;
use crate::model::{FontScheme, Theme};
use crate::units::convert_color;
use crate::xml::XmlElement;

/// Parse a theme from XML content.
pub fn parse_theme(xml: &str) -> Result<Theme> {
    let root = XmlElement::parse(xml)?;
    let mut theme = Theme::default();

    if let Some(colors) = root.descendant("a:clrScheme") {
        for entry in colors.elements() {
            let key = entry.local_name().to_string();
            // a:srgbClr carries the value; a:sysClr its last computed colour
            let value = entry.elements().next().and_then(|c| match c.name.as_str() {
                "a:srgbClr" => c.attr("val").and_then(convert_color),
                "a:sysClr" => c.attr("lastClr").and_then(convert_color),
                _ => None,
            });
            if let Some(value) = value {
                theme.colors.insert(key, value);
            }
        }
    }

    if let Some(fonts) = root.descendant("a:fontScheme") {
        if let Some(major) = fonts.child("a:majorFont") {
            theme.major_font = parse_font_scheme(major);
        }
        if let Some(minor) = fonts.child("a:minorFont") {
            theme.minor_font = parse_font_scheme(minor);
        }
    }

    Ok(theme)
}

fn parse_font_scheme(el: &XmlElement) -> FontScheme {
    let typeface = |name: &str| {
        el.child(name)
            .and_then(|f| f.attr("typeface"))
            .filter(|t| !t.is_empty())
            .map(String::from)
    };
    FontScheme {
        latin: typeface("a:latin"),
        east_asian: typeface("a:ea"),
        complex_script: typeface("a:cs"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme() {
        let xml = r#"<a:theme xmlns:a="a" name="Office Theme">
  <a:themeElements>
    <a:clrScheme name="Office">
      <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:accent1><a:srgbClr val="4472C4"/></a:accent1>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
    </a:clrScheme>
    <a:fontScheme name="Office">
      <a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>
      <a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>
    </a:fontScheme>
  </a:themeElements>
</a:theme>"#;
        let theme = parse_theme(xml).unwrap();
        assert_eq!(theme.colors.get("dk1").map(String::as_str), Some("#000000"));
        assert_eq!(theme.colors.get("accent1").map(String::as_str), Some("#4472C4"));
        assert_eq!(theme.colors.len(), 4);
        assert_eq!(theme.major_font.latin.as_deref(), Some("Calibri Light"));
        assert!(theme.minor_font.east_asian.is_none());
    }
}
