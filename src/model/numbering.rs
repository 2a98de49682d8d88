//! Numbering (list) catalog and list counters.

use super::CssProps;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// What follows the list marker (`w:suff`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LevelSuffix {
    #[default]
    Tab,
    Space,
    Nothing,
}

impl LevelSuffix {
    pub fn parse(value: &str) -> Self {
        match value {
            "space" => LevelSuffix::Space,
            "nothing" => LevelSuffix::Nothing,
            _ => LevelSuffix::Tab,
        }
    }
}

/// A numbering level definition (`w:lvl`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberingLevel {
    /// Level index (0-8)
    pub level: u8,
    /// Start value
    pub start: u32,
    /// Number format (decimal, bullet, lowerLetter, etc.)
    pub format: String,
    /// Level text (e.g., "%1.", "%1.%2.")
    pub text: String,
    #[serde(default)]
    pub suffix: LevelSuffix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    /// 1-based level whose use restarts this one; 0 never restarts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart: Option<u8>,
    /// Display every level as arabic numerals (`w:isLgl`)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub legal: bool,
    /// `w:lvlPicBulletId`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_bullet: Option<String>,
    /// Paragraph formatting (indentation) applied to numbered paragraphs
    #[serde(default, skip_serializing_if = "CssProps::is_empty")]
    pub paragraph: CssProps,
    /// Run formatting applied to the marker
    #[serde(default, skip_serializing_if = "CssProps::is_empty")]
    pub run: CssProps,
}

impl NumberingLevel {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            start: 1,
            format: "decimal".to_string(),
            text: String::new(),
            suffix: LevelSuffix::Tab,
            justification: None,
            restart: None,
            legal: false,
            picture_bullet: None,
            paragraph: CssProps::new(),
            run: CssProps::new(),
        }
    }

    /// Whether a paragraph at `used` level restarts this level's counter.
    fn restarts_after(&self, used: u8) -> bool {
        match self.restart {
            None => used < self.level,
            Some(0) => false,
            Some(r) => used < r,
        }
    }
}

/// Abstract numbering definition (`w:abstractNum`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbstractNumbering {
    pub id: String,
    pub levels: Vec<NumberingLevel>,
    /// Defines the numbering style with this id (`w:styleLink`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_link: Option<String>,
    /// Takes its levels from the numbering style with this id (`w:numStyleLink`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_style_link: Option<String>,
}

impl AbstractNumbering {
    pub fn level(&self, level: u8) -> Option<&NumberingLevel> {
        self.levels.iter().find(|l| l.level == level)
    }
}

/// Per-instance level override (`w:lvlOverride`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<NumberingLevel>,
}

/// Concrete numbering instance (`w:num`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberingInstance {
    pub id: String,
    pub abstract_id: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub overrides: HashMap<u8, LevelOverride>,
}

/// Collection of numbering definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberingCatalog {
    pub abstracts: HashMap<String, AbstractNumbering>,
    pub instances: HashMap<String, NumberingInstance>,
    /// Picture bullet id to image relationship id (`w:numPicBullet`)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub picture_bullets: HashMap<String, String>,
    /// Numbering style id to the instance it points at
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub style_numbering: HashMap<String, String>,
}

impl NumberingCatalog {
    /// Resolve the abstract definition of an instance, following
    /// `w:numStyleLink` indirection once.
    pub fn abstract_for(&self, num_id: &str) -> Option<&AbstractNumbering> {
        let instance = self.instances.get(num_id)?;
        let abstract_num = self.abstracts.get(&instance.abstract_id)?;

        if let Some(link) = &abstract_num.num_style_link {
            let linked = self
                .abstracts
                .values()
                .find(|a| a.style_link.as_deref() == Some(link.as_str()))
                .or_else(|| {
                    let target = self.style_numbering.get(link)?;
                    let inst = self.instances.get(target)?;
                    self.abstracts.get(&inst.abstract_id)
                });
            if let Some(linked) = linked {
                if !linked.levels.is_empty() {
                    return Some(linked);
                }
            }
        }

        Some(abstract_num)
    }

    /// The effective level definition for `(num_id, level)`.
    ///
    /// `None` when the instance, its definition or the level does not exist;
    /// such paragraphs render without numbering.
    pub fn level(&self, num_id: &str, level: u8) -> Option<&NumberingLevel> {
        let instance = self.instances.get(num_id)?;
        if let Some(level_def) = instance.overrides.get(&level).and_then(|o| o.level.as_ref()) {
            return Some(level_def);
        }
        self.abstract_for(num_id)?.level(level)
    }

    /// The start override of an instance level.
    pub fn start_override(&self, num_id: &str, level: u8) -> Option<u32> {
        self.instances
            .get(num_id)?
            .overrides
            .get(&level)
            .and_then(|o| o.start.or_else(|| o.level.as_ref().map(|l| l.start)))
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Running list counters for one rendering pass.
///
/// Counters are keyed by abstract definition so instances sharing a
/// definition continue each other, except where a start override restarts
/// an instance.
#[derive(Debug, Default)]
pub struct NumberingCounters {
    counters: HashMap<(String, u8), u32>,
    overridden: HashSet<(String, u8)>,
}

impl NumberingCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counter for a numbered paragraph and return the marker
    /// text, or `None` when the level is undefined.
    pub fn next_marker(&mut self, catalog: &NumberingCatalog, num_id: &str, level: u8) -> Option<String> {
        let level_def = catalog.level(num_id, level)?;
        let abstract_num = catalog.abstract_for(num_id)?;
        let key_base = abstract_num.id.clone();

        // The first paragraph of an instance with a start override restarts
        let override_key = (num_id.to_string(), level);
        let restart_value = match catalog.start_override(num_id, level) {
            Some(start) if self.overridden.insert(override_key) => Some(start),
            _ => None,
        };

        let key = (key_base.clone(), level);
        let value = match (restart_value, self.counters.get(&key)) {
            (Some(start), _) => start,
            (None, Some(current)) => current + 1,
            (None, None) => level_def.start,
        };
        self.counters.insert(key, value);

        // Deeper levels restart according to their lvlRestart rule
        for deeper in &abstract_num.levels {
            if deeper.level > level && deeper.restarts_after(level) {
                self.counters.remove(&(key_base.clone(), deeper.level));
            }
        }

        let mut text = level_def.text.clone();
        for index in 0..9u8 {
            let placeholder = format!("%{}", index + 1);
            if !text.contains(&placeholder) {
                continue;
            }
            let (count, format) = if index == level {
                (value, level_def.format.as_str())
            } else {
                let other = catalog.level(num_id, index);
                let count = self
                    .counters
                    .get(&(key_base.clone(), index))
                    .copied()
                    .or_else(|| other.map(|l| l.start))
                    .unwrap_or(1);
                (count, other.map(|l| l.format.as_str()).unwrap_or("decimal"))
            };
            let format = if level_def.legal { "decimal" } else { format };
            text = text.replace(&placeholder, &format_numeral(count, format));
        }

        Some(text)
    }
}

/// Format a counter value in a numbering format.
pub fn format_numeral(value: u32, format: &str) -> String {
    match format {
        "decimal" => value.to_string(),
        "decimalZero" => format!("{:02}", value),
        "lowerLetter" => letters(value, false),
        "upperLetter" => letters(value, true),
        "lowerRoman" => roman(value).to_lowercase(),
        "upperRoman" => roman(value),
        "ordinal" => format!("{}{}", value, ordinal_suffix(value)),
        "bullet" | "none" => String::new(),
        _ => value.to_string(),
    }
}

/// Word repeats the letter: a..z, aa..zz, aaa..
fn letters(value: u32, upper: bool) -> String {
    if value == 0 {
        return String::new();
    }
    let index = (value - 1) % 26;
    let repeat = ((value - 1) / 26 + 1) as usize;
    let base = if upper { b'A' } else { b'a' };
    let letter = (base + index as u8) as char;
    std::iter::repeat(letter).take(repeat).collect()
}

fn roman(mut value: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (n, s) in TABLE {
        while value >= n {
            out.push_str(s);
            value -= n;
        }
    }
    out
}

fn ordinal_suffix(value: u32) -> &'static str {
    match (value % 10, value % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(index: u8, format: &str, text: &str) -> NumberingLevel {
        NumberingLevel {
            format: format.to_string(),
            text: text.to_string(),
            ..NumberingLevel::new(index)
        }
    }

    fn catalog() -> NumberingCatalog {
        let mut catalog = NumberingCatalog::default();
        catalog.abstracts.insert(
            "0".into(),
            AbstractNumbering {
                id: "0".into(),
                levels: vec![level(0, "decimal", "%1."), level(1, "lowerLetter", "%1.%2)")],
                ..Default::default()
            },
        );
        catalog.instances.insert(
            "1".into(),
            NumberingInstance {
                id: "1".into(),
                abstract_id: "0".into(),
                overrides: HashMap::new(),
            },
        );
        catalog
    }

    #[test]
    fn test_counters_and_restart() {
        let catalog = catalog();
        let mut counters = NumberingCounters::new();

        assert_eq!(counters.next_marker(&catalog, "1", 0).unwrap(), "1.");
        assert_eq!(counters.next_marker(&catalog, "1", 1).unwrap(), "1.a)");
        assert_eq!(counters.next_marker(&catalog, "1", 1).unwrap(), "1.b)");
        assert_eq!(counters.next_marker(&catalog, "1", 0).unwrap(), "2.");
        // level 1 restarted after level 0 was used
        assert_eq!(counters.next_marker(&catalog, "1", 1).unwrap(), "2.a)");
    }

    #[test]
    fn test_out_of_range_level_has_no_marker() {
        let catalog = catalog();
        let mut counters = NumberingCounters::new();
        assert!(counters.next_marker(&catalog, "1", 5).is_none());
        assert!(counters.next_marker(&catalog, "42", 0).is_none());
    }

    #[test]
    fn test_start_override() {
        let mut catalog = catalog();
        let mut overrides = HashMap::new();
        overrides.insert(
            0,
            LevelOverride {
                start: Some(5),
                level: None,
            },
        );
        catalog.instances.insert(
            "2".into(),
            NumberingInstance {
                id: "2".into(),
                abstract_id: "0".into(),
                overrides,
            },
        );

        let mut counters = NumberingCounters::new();
        assert_eq!(counters.next_marker(&catalog, "1", 0).unwrap(), "1.");
        assert_eq!(counters.next_marker(&catalog, "2", 0).unwrap(), "5.");
        assert_eq!(counters.next_marker(&catalog, "2", 0).unwrap(), "6.");
    }

    #[test]
    fn test_format_numeral() {
        assert_eq!(format_numeral(4, "upperRoman"), "IV");
        assert_eq!(format_numeral(1994, "lowerRoman"), "mcmxciv");
        assert_eq!(format_numeral(28, "lowerLetter"), "bb");
        assert_eq!(format_numeral(3, "decimalZero"), "03");
        assert_eq!(format_numeral(12, "ordinal"), "12th");
        assert_eq!(format_numeral(22, "ordinal"), "22nd");
        assert_eq!(format_numeral(7, "bullet"), "");
    }
}
