//! Document settings (`word/settings.xml`) parsing.

use crate::error::Result;
use crate::model::Settings;
use crate::units::{convert_boolean, convert_length, LengthUsage};
use crate::xml::XmlElement;

/// Parse settings from XML content.
pub fn parse_settings(xml: &str) -> Result<Settings> {
    let root = XmlElement::parse(xml)?;
    let mut settings = Settings::default();

    for el in root.elements() {
        match el.name.as_str() {
            "w:defaultTabStop" => {
                if let Some(tab) = el.val().and_then(|v| convert_length(v, LengthUsage::Dxa)) {
                    settings.default_tab_stop = tab;
                }
            }
            "w:evenAndOddHeaders" => settings.even_and_odd_headers = convert_boolean(el.val(), true),
            "w:autoHyphenation" => settings.auto_hyphenation = convert_boolean(el.val(), true),
            _ => {}
        }
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        let xml = r#"<w:settings xmlns:w="w">
  <w:zoom w:percent="100"/>
  <w:defaultTabStop w:val="708"/>
  <w:evenAndOddHeaders/>
  <w:autoHyphenation w:val="false"/>
</w:settings>"#;
        let settings = parse_settings(xml).unwrap();
        assert_eq!(settings.default_tab_stop, "35.40pt");
        assert!(settings.even_and_odd_headers);
        assert!(!settings.auto_hyphenation);
    }

    #[test]
    fn test_defaults() {
        let settings = parse_settings("<w:settings/>").unwrap();
        assert_eq!(settings, Settings::default());
    }
}
