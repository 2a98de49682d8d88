//! The typed element tree.

use super::{CssProps, SectionProperties};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node of the document tree.
///
/// Children are exclusively owned; the tree has no back references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// What this element is, with its kind-specific attributes
    pub kind: ElementKind,

    /// Child elements in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,

    /// Direct formatting translated to CSS at parse time
    #[serde(default, skip_serializing_if = "CssProps::is_empty")]
    pub css: CssProps,

    /// Named style reference (`w:pStyle`, `w:rStyle`, `w:tblStyle`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
}

impl Element {
    /// Create an element with no children or formatting.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            css: CssProps::new(),
            style_id: None,
        }
    }

    /// Create an element with the given children.
    pub fn with_children(kind: ElementKind, children: Vec<Element>) -> Self {
        Self {
            children,
            ..Self::new(kind)
        }
    }

    /// Create a text element.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Text { text: text.into() })
    }

    /// Create a run holding a single text element.
    pub fn text_run(text: impl Into<String>) -> Self {
        Self::with_children(ElementKind::Run, vec![Self::text(text)])
    }

    /// Paragraph properties, if this is a paragraph.
    pub fn paragraph_props(&self) -> Option<&ParagraphProps> {
        match &self.kind {
            ElementKind::Paragraph(props) => Some(props),
            _ => None,
        }
    }

    /// Plain text content of the subtree (deleted text excluded).
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            ElementKind::Text { text } => out.push_str(text),
            ElementKind::Tab => out.push('\t'),
            ElementKind::Deleted(_) | ElementKind::InstrText { .. } => return,
            _ => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
        if matches!(self.kind, ElementKind::Paragraph(_)) {
            out.push('\n');
        }
    }

    /// Depth-first search for the first element matching a predicate.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(pred))
    }

    /// Visit every element of the subtree in document order.
    pub fn walk(&self, visit: &mut dyn FnMut(&Element)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// The closed set of element kinds the parser produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    /// Root of a document body, carrying the final section's properties
    Document {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        section: Option<Box<SectionProperties>>,
    },
    /// Root of a header part
    Header,
    /// Root of a footer part
    Footer,
    Paragraph(ParagraphProps),
    Run,
    Text {
        text: String,
    },
    DeletedText {
        text: String,
    },
    Tab,
    Break {
        break_type: BreakType,
    },
    Symbol {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font: Option<String>,
        char_code: String,
    },
    NoBreakHyphen,
    SoftHyphen,
    Hyperlink {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rel_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tooltip: Option<String>,
    },
    BookmarkStart {
        id: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        col_first: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        col_last: Option<u32>,
    },
    BookmarkEnd {
        id: String,
    },
    SimpleField {
        instruction: String,
    },
    FieldChar {
        char_type: FieldCharType,
    },
    InstrText {
        text: String,
    },
    FootnoteReference {
        id: String,
    },
    EndnoteReference {
        id: String,
    },
    Footnote {
        id: String,
    },
    Endnote {
        id: String,
    },
    CommentRangeStart {
        id: String,
    },
    CommentRangeEnd {
        id: String,
    },
    CommentReference {
        id: String,
    },
    Comment(CommentInfo),
    Inserted(ChangeInfo),
    Deleted(ChangeInfo),
    Drawing {
        inline: bool,
    },
    Image {
        rel_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Table(TableProps),
    TableRow(RowProps),
    TableCell(CellProps),
    Math {
        node: MathNode,
    },
    Vml(VmlShape),
    AltChunk {
        rel_id: String,
    },
}

/// The kind of a `w:br`, plus Word's rendered page break hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakType {
    Page,
    Column,
    TextWrapping,
    /// `w:lastRenderedPageBreak`: where Word last broke the page
    LastRenderedPage,
}

/// Position within a complex field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldCharType {
    Begin,
    Separate,
    End,
}

/// A `(numbering id, level)` pair referenced by a paragraph or style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberingRef {
    pub id: String,
    pub level: u8,
}

/// A custom tab stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabStop {
    /// Alignment (`left`, `center`, `right`, `decimal`, `clear`, ...)
    pub style: String,
    /// Leader character name (`dot`, `hyphen`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<String>,
    /// Position as a CSS length
    pub position: String,
}

/// Paragraph attributes that are not plain CSS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphProps {
    /// Direct numbering reference (`w:numPr`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbering: Option<NumberingRef>,

    /// Section properties ending a section at this paragraph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<Box<SectionProperties>>,

    /// Direct outline level (0 = heading 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_level: Option<u8>,

    /// `w:pageBreakBefore`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub page_break_before: bool,

    /// Custom tab stops
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tabs: Vec<TabStop>,
}

/// Author and date of a tracked change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Move source/destination rather than plain insertion/deletion
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub moved: bool,
}

/// Comment metadata from `word/comments.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// `w:tblLook` flags selecting which conditional formats apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLook {
    pub first_row: bool,
    pub last_row: bool,
    pub first_column: bool,
    pub last_column: bool,
    pub no_h_band: bool,
    pub no_v_band: bool,
}

impl Default for TableLook {
    /// Word's default look (`04A0`).
    fn default() -> Self {
        Self {
            first_row: true,
            last_row: false,
            first_column: true,
            last_column: false,
            no_h_band: false,
            no_v_band: true,
        }
    }
}

impl TableLook {
    /// Decode the legacy hexadecimal `w:val` bit mask.
    pub fn from_mask(mask: u32) -> Self {
        Self {
            first_row: mask & 0x0020 != 0,
            last_row: mask & 0x0040 != 0,
            first_column: mask & 0x0080 != 0,
            last_column: mask & 0x0100 != 0,
            no_h_band: mask & 0x0200 != 0,
            no_v_band: mask & 0x0400 != 0,
        }
    }
}

/// Table attributes that are not plain CSS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableProps {
    /// `w:tblGrid` column widths as CSS lengths
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grid: Vec<String>,

    /// Conditional formatting selector
    #[serde(default)]
    pub look: TableLook,

    /// Formatting every cell receives (inside borders, default cell margins)
    #[serde(default, skip_serializing_if = "CssProps::is_empty")]
    pub cell_css: CssProps,
}

/// Table row attributes that are not plain CSS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowProps {
    /// Repeated header row (`w:tblHeader`)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_header: bool,
    /// Grid columns skipped before the first cell
    #[serde(default, skip_serializing_if = "is_zero")]
    pub grid_before: u32,
    /// Grid columns skipped after the last cell
    #[serde(default, skip_serializing_if = "is_zero")]
    pub grid_after: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// Vertical merge state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VMerge {
    /// Starts a vertically merged region
    Restart,
    /// Covered by the region started above
    Continue,
}

/// Table cell attributes that are not plain CSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellProps {
    /// Number of grid columns spanned
    pub grid_span: u32,
    /// Vertical merge state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_merge: Option<VMerge>,
    /// Preferred width (`w:tcW`) as a CSS length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

impl Default for CellProps {
    fn default() -> Self {
        Self {
            grid_span: 1,
            v_merge: None,
            width: None,
        }
    }
}

/// The supported Office Math constructs.
///
/// This is the explicit list the renderer translates to MathML. Anything else
/// found inside math markup becomes [`MathNode::Unsupported`] and renders as
/// its plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum MathNode {
    /// `m:oMath`
    Math,
    /// `m:oMathPara`
    MathPara,
    /// `m:r`
    Run,
    /// `m:f`
    Fraction { bar: bool },
    /// `m:num`
    Numerator,
    /// `m:den`
    Denominator,
    /// `m:rad`
    Radical { hide_degree: bool },
    /// `m:deg`
    Degree,
    /// `m:e`
    Base,
    /// `m:sSup`
    Superscript,
    /// `m:sSub`
    Subscript,
    /// `m:sSubSup`
    SubSuperscript,
    /// `m:sPre`
    PreSubSuperscript,
    /// `m:sup`
    SuperscriptArg,
    /// `m:sub`
    SubscriptArg,
    /// `m:nary`
    Nary {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chr: Option<String>,
        under_over: bool,
        hide_sub: bool,
        hide_sup: bool,
    },
    /// `m:d`
    Delimiter {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        begin: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        separator: Option<String>,
    },
    /// `m:func`
    Function,
    /// `m:fName`
    FunctionName,
    /// `m:limLow`
    LowerLimit,
    /// `m:limUpp`
    UpperLimit,
    /// `m:lim`
    Limit,
    /// `m:bar`
    Bar { top: bool },
    /// `m:acc`
    Accent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chr: Option<String>,
    },
    /// `m:groupChr`
    GroupChar {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chr: Option<String>,
        top: bool,
    },
    /// `m:m`
    Matrix,
    /// `m:mr`
    MatrixRow,
    /// `m:eqArr`
    EqArray,
    /// `m:box`
    Boxed,
    /// `m:borderBox`
    BorderBox,
    /// `m:phant`
    Phantom,
    /// Any other math element, kept for its text
    Unsupported { name: String },
}

/// The supported subset of legacy VML shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VmlShapeKind {
    /// `w:pict` / `w:object` container
    Picture,
    Group,
    Rect,
    RoundRect,
    Oval,
    Line,
    PolyLine,
    Shape,
    /// `v:textbox` content holder
    TextBox,
}

impl VmlShapeKind {
    /// Map a VML element name to a supported shape kind.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "w:pict" | "w:object" => VmlShapeKind::Picture,
            "v:group" => VmlShapeKind::Group,
            "v:rect" => VmlShapeKind::Rect,
            "v:roundrect" => VmlShapeKind::RoundRect,
            "v:oval" => VmlShapeKind::Oval,
            "v:line" => VmlShapeKind::Line,
            "v:polyline" => VmlShapeKind::PolyLine,
            "v:shape" => VmlShapeKind::Shape,
            "v:textbox" => VmlShapeKind::TextBox,
            _ => return None,
        })
    }
}

/// A VML shape with the attributes the SVG translation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmlShape {
    pub kind: VmlShapeKind,
    /// Geometry and paint attributes (`fill`, `stroke`, `stroke-width`,
    /// `points`, `x1`..`y2`, `rx`, `viewBox`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    /// Image fill (`v:imagedata r:id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_rel: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_skips_deletions() {
        let para = Element::with_children(
            ElementKind::Paragraph(ParagraphProps::default()),
            vec![
                Element::text_run("kept"),
                Element::with_children(
                    ElementKind::Deleted(ChangeInfo::default()),
                    vec![Element::text_run("gone")],
                ),
            ],
        );
        assert_eq!(para.plain_text(), "kept\n");
    }

    #[test]
    fn test_table_look_mask() {
        let look = TableLook::from_mask(0x04A0);
        assert_eq!(look, TableLook::default());
        let look = TableLook::from_mask(0x0060);
        assert!(look.first_row && look.last_row && !look.first_column);
    }

    #[test]
    fn test_vml_kind_enumeration() {
        assert_eq!(VmlShapeKind::from_name("v:oval"), Some(VmlShapeKind::Oval));
        assert_eq!(VmlShapeKind::from_name("v:arc"), None);
    }

    #[test]
    fn test_element_serialization() {
        let run = Element::text_run("Hi");
        let json = serde_json::to_string(&run).unwrap();
        assert!(json.contains("\"type\":\"run\""));
        assert!(json.contains("\"text\":\"Hi\""));
        assert!(!json.contains("styleId"));
    }
}
