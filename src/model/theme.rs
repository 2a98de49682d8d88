//! Theme and document settings.

use crate::units::css_string;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Font scheme entries (`a:majorFont` / `a:minorFont`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontScheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub east_asian: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complex_script: Option<String>,
}

/// The document theme (`word/theme/theme1.xml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Scheme colour name (`dk1`, `accent1`, ...) to CSS colour
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub major_font: FontScheme,
    #[serde(default)]
    pub minor_font: FontScheme,
}

impl Theme {
    /// CSS custom properties the theme defines.
    ///
    /// Theme references in formatting resolve through these variables
    /// (`--docx-accent1-color`, `--docx-majorHAnsi-font`, ...). Font values
    /// are quoted CSS strings.
    pub fn css_variables(&self) -> Vec<(String, String)> {
        let mut vars: Vec<(String, String)> = self
            .colors
            .iter()
            .map(|(k, v)| (format!("--docx-{}-color", k), v.clone()))
            .collect();

        let mut font = |scheme: &FontScheme, prefix: &str| {
            if let Some(latin) = &scheme.latin {
                vars.push((format!("--docx-{}HAnsi-font", prefix), css_string(latin)));
                vars.push((format!("--docx-{}Ascii-font", prefix), css_string(latin)));
            }
            if let Some(ea) = &scheme.east_asian {
                vars.push((format!("--docx-{}EastAsia-font", prefix), css_string(ea)));
            }
            if let Some(cs) = &scheme.complex_script {
                vars.push((format!("--docx-{}Bidi-font", prefix), css_string(cs)));
            }
        };
        font(&self.major_font, "major");
        font(&self.minor_font, "minor");
        vars
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.major_font.latin.is_none() && self.minor_font.latin.is_none()
    }
}

/// Settings from `word/settings.xml` that affect rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Default tab stop as a CSS length
    pub default_tab_stop: String,
    #[serde(default)]
    pub even_and_odd_headers: bool,
    #[serde(default)]
    pub auto_hyphenation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // 720 twips
            default_tab_stop: "36.00pt".to_string(),
            even_and_odd_headers: false,
            auto_hyphenation: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_variables() {
        let mut theme = Theme::default();
        theme.colors.insert("accent1".into(), "#4472C4".into());
        theme.major_font.latin = Some("Calibri Light".into());

        let vars = theme.css_variables();
        assert!(vars.contains(&("--docx-accent1-color".to_string(), "#4472C4".to_string())));
        assert!(vars.contains(&("--docx-majorHAnsi-font".to_string(), "'Calibri Light'".to_string())));
        assert!(!theme.is_empty());
    }
}
