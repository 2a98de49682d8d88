//! Section (page layout) properties.

use serde::{Deserialize, Serialize};

/// Which pages a header or footer reference applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderFooterKind {
    Default,
    First,
    Even,
}

impl HeaderFooterKind {
    /// Parse the `w:type` attribute of a header/footer reference.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("first") => HeaderFooterKind::First,
            Some("even") => HeaderFooterKind::Even,
            _ => HeaderFooterKind::Default,
        }
    }
}

/// A `w:headerReference` or `w:footerReference`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFooterRef {
    pub kind: HeaderFooterKind,
    pub rel_id: String,
}

/// Page size. Lengths are CSS values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub landscape: bool,
}

/// Page margins. Lengths are CSS values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gutter: Option<String>,
}

/// Text columns of a section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Columns {
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub separator: bool,
}

/// Properties of one document section (`w:sectPr`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    #[serde(default)]
    pub page_size: PageSize,

    #[serde(default)]
    pub margins: PageMargins,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Columns>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderFooterRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footers: Vec<HeaderFooterRef>,

    /// Distinct first-page header/footer (`w:titlePg`)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub title_page: bool,

    /// Section start type (`nextPage`, `continuous`, `evenPage`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_type: Option<String>,

    /// Page numbering restart value (`w:pgNumType w:start`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number_start: Option<u32>,
}

impl SectionProperties {
    /// Header reference of the given kind.
    pub fn header(&self, kind: HeaderFooterKind) -> Option<&HeaderFooterRef> {
        self.headers.iter().find(|r| r.kind == kind)
    }

    /// Footer reference of the given kind.
    pub fn footer(&self, kind: HeaderFooterKind) -> Option<&HeaderFooterRef> {
        self.footers.iter().find(|r| r.kind == kind)
    }

    /// Column count, treating a missing or zero count as one column.
    pub fn column_count(&self) -> u32 {
        self.columns.as_ref().map(|c| c.count.max(1)).unwrap_or(1)
    }
}
