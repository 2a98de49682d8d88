//! Style catalog: named styles, document defaults and table conditions.

use super::{CssProps, NumberingRef};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Maximum inheritance depth followed before a chain is considered broken.
const MAX_CHAIN_DEPTH: usize = 64;

/// Style type (paragraph, character, table, numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    /// Parse the `w:type` attribute of `w:style`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paragraph" => Some(StyleType::Paragraph),
            "character" => Some(StyleType::Character),
            "table" => Some(StyleType::Table),
            "numbering" => Some(StyleType::Numbering),
            _ => None,
        }
    }
}

/// A table region that can carry conditional formatting (`w:tblStylePr`).
///
/// Variants are declared in increasing precedence, so sorting by the derived
/// `Ord` gives the order in which the formats are layered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableCondition {
    WholeTable,
    Band1Vert,
    Band2Vert,
    Band1Horz,
    Band2Horz,
    FirstCol,
    LastCol,
    FirstRow,
    LastRow,
    NwCell,
    NeCell,
    SwCell,
    SeCell,
}

impl TableCondition {
    /// Parse the `w:type` attribute of `w:tblStylePr`.
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "wholeTable" => TableCondition::WholeTable,
            "band1Vert" => TableCondition::Band1Vert,
            "band2Vert" => TableCondition::Band2Vert,
            "band1Horz" => TableCondition::Band1Horz,
            "band2Horz" => TableCondition::Band2Horz,
            "firstCol" => TableCondition::FirstCol,
            "lastCol" => TableCondition::LastCol,
            "firstRow" => TableCondition::FirstRow,
            "lastRow" => TableCondition::LastRow,
            "nwCell" => TableCondition::NwCell,
            "neCell" => TableCondition::NeCell,
            "swCell" => TableCondition::SwCell,
            "seCell" => TableCondition::SeCell,
            _ => return None,
        })
    }
}

/// Formatting layers a style (or a conditional format) defines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleLayers {
    #[serde(default, skip_serializing_if = "CssProps::is_empty")]
    pub paragraph: CssProps,
    #[serde(default, skip_serializing_if = "CssProps::is_empty")]
    pub run: CssProps,
    #[serde(default, skip_serializing_if = "CssProps::is_empty")]
    pub table: CssProps,
    #[serde(default, skip_serializing_if = "CssProps::is_empty")]
    pub row: CssProps,
    #[serde(default, skip_serializing_if = "CssProps::is_empty")]
    pub cell: CssProps,
}

impl StyleLayers {
    /// Merge another set of layers into this one (other takes precedence).
    pub fn merge(&mut self, other: &StyleLayers) {
        self.paragraph.merge(&other.paragraph);
        self.run.merge(&other.run);
        self.table.merge(&other.table);
        self.row.merge(&other.row);
        self.cell.merge(&other.cell);
    }
}

/// A parsed `w:style`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleDefinition {
    /// Style ID (e.g., "Heading1")
    pub id: String,

    /// Display name (e.g., "heading 1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_type: Option<StyleType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_default: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_custom: bool,

    #[serde(default)]
    pub layers: StyleLayers,

    /// Numbering attached to paragraphs of this style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbering: Option<NumberingRef>,

    /// Outline level (0 = heading 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_level: Option<u8>,

    /// Conditional table formats
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub conditions: HashMap<TableCondition, StyleLayers>,
}

/// `w:docDefaults`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocDefaults {
    #[serde(default, skip_serializing_if = "CssProps::is_empty")]
    pub paragraph: CssProps,
    #[serde(default, skip_serializing_if = "CssProps::is_empty")]
    pub run: CssProps,
}

/// All styles of a document, keyed by style id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleCatalog {
    pub styles: HashMap<String, StyleDefinition>,
    #[serde(default)]
    pub defaults: DocDefaults,
}

impl StyleCatalog {
    /// Add a style, replacing any previous one with the same id.
    pub fn insert(&mut self, style: StyleDefinition) {
        self.styles.insert(style.id.clone(), style);
    }

    /// Look up a style by id.
    pub fn get(&self, id: &str) -> Option<&StyleDefinition> {
        self.styles.get(id)
    }

    /// The style flagged `w:default="1"` for a style type.
    pub fn default_style(&self, style_type: StyleType) -> Option<&StyleDefinition> {
        // Several defaults per type is malformed; pick deterministically
        self.styles
            .values()
            .filter(|s| s.is_default && s.style_type == Some(style_type))
            .min_by(|a, b| a.id.cmp(&b.id))
    }

    /// The inheritance chain of a style, most distant ancestor first.
    ///
    /// Unknown ids end the chain. The walk is bounded so a catalog that
    /// skipped [`StyleCatalog::break_cycles`] still terminates.
    pub fn chain(&self, id: &str) -> Vec<&StyleDefinition> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);

        while let Some(style_id) = current {
            if chain.len() >= MAX_CHAIN_DEPTH || !seen.insert(style_id) {
                break;
            }
            match self.styles.get(style_id) {
                Some(style) => {
                    chain.push(style);
                    current = style.based_on.as_deref();
                }
                None => break,
            }
        }

        chain.reverse();
        chain
    }

    /// Style id followed by `based_on` ids until a repeat, if one exists.
    fn find_cycle(&self, start: &str) -> Option<Vec<String>> {
        let mut path: Vec<String> = Vec::new();
        let mut current = Some(start.to_string());

        while let Some(id) = current {
            if let Some(pos) = path.iter().position(|p| *p == id) {
                let mut cycle = path.split_off(pos);
                cycle.push(id);
                return Some(cycle);
            }
            current = self.styles.get(&id).and_then(|s| s.based_on.clone());
            path.push(id);
        }
        None
    }

    /// Check that every inheritance chain terminates.
    pub fn validate(&self) -> Result<()> {
        let mut ids: Vec<&String> = self.styles.keys().collect();
        ids.sort();
        for id in ids {
            if let Some(cycle) = self.find_cycle(id) {
                return Err(Error::StyleCycle(cycle.join(" -> ")));
            }
        }
        Ok(())
    }

    /// Cut every inheritance cycle by dropping the `based_on` link that
    /// closes it. Returns the ids whose link was removed.
    pub fn break_cycles(&mut self) -> Vec<String> {
        let mut broken = Vec::new();
        let mut ids: Vec<String> = self.styles.keys().cloned().collect();
        ids.sort();

        for id in ids {
            while let Some(cycle) = self.find_cycle(&id) {
                // cycle is [a, b, ..., a]; the last link before the repeat closes it
                let closer = cycle[cycle.len() - 2].clone();
                if let Some(style) = self.styles.get_mut(&closer) {
                    style.based_on = None;
                }
                broken.push(closer);
            }
        }
        broken
    }

    /// Effective outline level of a paragraph style, following inheritance.
    ///
    /// Built-in heading styles without an explicit level derive it from
    /// their id (`Heading1` .. `Heading9`).
    pub fn outline_level(&self, id: &str) -> Option<u8> {
        self.chain(id)
            .iter()
            .rev()
            .find_map(|s| s.outline_level.or_else(|| heading_level_from_id(&s.id)))
    }

    /// Effective numbering reference of a paragraph style.
    pub fn numbering(&self, id: &str) -> Option<&NumberingRef> {
        self.chain(id).into_iter().rev().find_map(|s| s.numbering.as_ref())
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

fn heading_level_from_id(id: &str) -> Option<u8> {
    let rest = id
        .strip_prefix("Heading")
        .or_else(|| id.strip_prefix("heading"))?;
    let level: u8 = rest.trim().parse().ok()?;
    (1..=9).contains(&level).then(|| level - 1)
}
