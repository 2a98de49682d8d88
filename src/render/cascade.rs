//! Style cascade resolution.
//!
//! Formatting is layered from least to most specific, later layers winning:
//! document defaults, table style (with the conditional formats that apply
//! to the cell), the named style chain from its most distant ancestor down,
//! numbering level formatting and finally direct formatting.

use crate::model::{
    CssProps, Element, ElementKind, NumberingCatalog, NumberingLevel, NumberingRef,
    StyleCatalog, StyleDefinition, StyleLayers, StyleType, TableCondition, TableLook,
};
use std::collections::BTreeMap;

/// Table-derived formatting for the content of one cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellFormat {
    pub paragraph: CssProps,
    pub run: CssProps,
}

/// Resolved formatting of a paragraph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphFormat {
    pub css: CssProps,
    /// Run formatting every run of the paragraph starts from
    pub run: CssProps,
    /// Outline level 0-8 from direct formatting or the style chain
    pub outline_level: Option<u8>,
    pub numbering: Option<NumberingRef>,
}

/// A table style flattened along its inheritance chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFormat {
    pub css: CssProps,
    pub base: StyleLayers,
    pub conditions: BTreeMap<TableCondition, StyleLayers>,
    pub look: TableLook,
    /// Direct `w:tblPr` properties every cell receives
    pub cell_css: CssProps,
}

/// Where a cell sits in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl CellPosition {
    /// Conditional formats that apply, in increasing precedence.
    pub fn conditions(&self, look: &TableLook) -> Vec<TableCondition> {
        let mut out = vec![TableCondition::WholeTable];
        let first_row = look.first_row && self.row == 0;
        let last_row = look.last_row && self.rows > 0 && self.row == self.rows - 1;
        let first_col = look.first_column && self.col == 0;
        let last_col = look.last_column && self.cols > 0 && self.col == self.cols - 1;

        if !look.no_v_band && !first_col && !last_col {
            let band = self.col - usize::from(look.first_column);
            out.push(if band % 2 == 0 {
                TableCondition::Band1Vert
            } else {
                TableCondition::Band2Vert
            });
        }
        if !look.no_h_band && !first_row && !last_row {
            let band = self.row - usize::from(look.first_row);
            out.push(if band % 2 == 0 {
                TableCondition::Band1Horz
            } else {
                TableCondition::Band2Horz
            });
        }
        if first_col {
            out.push(TableCondition::FirstCol);
        }
        if last_col {
            out.push(TableCondition::LastCol);
        }
        if first_row {
            out.push(TableCondition::FirstRow);
        }
        if last_row {
            out.push(TableCondition::LastRow);
        }
        match (first_row, last_row, first_col, last_col) {
            (true, _, true, _) => out.push(TableCondition::NwCell),
            (true, _, _, true) => out.push(TableCondition::NeCell),
            (_, true, true, _) => out.push(TableCondition::SwCell),
            (_, true, _, true) => out.push(TableCondition::SeCell),
            _ => {}
        }
        out.sort();
        out
    }

    /// The conditions that describe the whole row: the row bands and the
    /// first/last row, without column or corner conditions.
    pub fn row_conditions(&self, look: &TableLook) -> Vec<TableCondition> {
        let mut out = self.conditions(look);
        out.retain(|c| {
            matches!(
                c,
                TableCondition::WholeTable
                    | TableCondition::Band1Horz
                    | TableCondition::Band2Horz
                    | TableCondition::FirstRow
                    | TableCondition::LastRow
            )
        });
        out
    }
}

/// Cascade resolver over one document's catalogs.
#[derive(Debug, Clone, Copy)]
pub struct Cascade<'a> {
    styles: &'a StyleCatalog,
    numbering: &'a NumberingCatalog,
}

impl<'a> Cascade<'a> {
    pub fn new(styles: &'a StyleCatalog, numbering: &'a NumberingCatalog) -> Self {
        Self { styles, numbering }
    }

    /// The chain of a named style, or of the default style of the type when
    /// the element names none (or an unknown one).
    fn chain(&self, id: Option<&str>, style_type: StyleType) -> Vec<&'a StyleDefinition> {
        match id.filter(|id| self.styles.get(id).is_some()) {
            Some(id) => self.styles.chain(id),
            None => self
                .styles
                .default_style(style_type)
                .map(|s| self.styles.chain(&s.id))
                .unwrap_or_default(),
        }
    }

    /// Resolve a paragraph, optionally inside a table cell.
    pub fn paragraph(&self, el: &Element, cell: Option<&CellFormat>) -> ParagraphFormat {
        let props = el.paragraph_props();
        let mut css = self.styles.defaults.paragraph.clone();
        let mut run = self.styles.defaults.run.clone();

        if let Some(cell) = cell {
            css.merge(&cell.paragraph);
            run.merge(&cell.run);
        }

        let chain = self.chain(el.style_id.as_deref(), StyleType::Paragraph);
        for style in &chain {
            css.merge(&style.layers.paragraph);
            run.merge(&style.layers.run);
        }

        let numbering = props
            .and_then(|p| p.numbering.clone())
            .or_else(|| chain.iter().rev().find_map(|s| s.numbering.clone()));
        if let Some(level) = numbering.as_ref().and_then(|n| self.level(n)) {
            css.merge(&level.paragraph);
        }

        css.merge(&el.css);

        let outline_level = props.and_then(|p| p.outline_level).or_else(|| {
            chain
                .last()
                .and_then(|style| self.styles.outline_level(&style.id))
        });

        ParagraphFormat {
            css,
            run,
            outline_level,
            numbering,
        }
    }

    /// Resolve a run on top of its paragraph's run formatting.
    pub fn run(&self, el: &Element, paragraph_run: &CssProps) -> CssProps {
        let mut css = paragraph_run.clone();
        for style in self.chain(el.style_id.as_deref(), StyleType::Character) {
            css.merge(&style.layers.run);
        }
        css.merge(&el.css);
        css
    }

    /// The numbering level a reference points at, if it is defined.
    pub fn level(&self, numbering: &NumberingRef) -> Option<&'a NumberingLevel> {
        self.numbering.level(&numbering.id, numbering.level)
    }

    /// Formatting of a numbering marker.
    pub fn marker(&self, level: &NumberingLevel, paragraph_run: &CssProps) -> CssProps {
        paragraph_run.merged(&level.run)
    }

    /// Flatten the style of a table element.
    pub fn table(&self, el: &Element) -> TableFormat {
        let (look, cell_css) = match &el.kind {
            ElementKind::Table(props) => (props.look, props.cell_css.clone()),
            _ => (TableLook::default(), CssProps::new()),
        };

        let mut base = StyleLayers::default();
        let mut conditions: BTreeMap<TableCondition, StyleLayers> = BTreeMap::new();
        for style in self.chain(el.style_id.as_deref(), StyleType::Table) {
            base.merge(&style.layers);
            for (condition, layers) in &style.conditions {
                conditions.entry(*condition).or_default().merge(layers);
            }
        }

        let mut css = base.table.clone();
        if let Some(whole) = conditions.get(&TableCondition::WholeTable) {
            css.merge(&whole.table);
        }
        css.merge(&el.css);

        TableFormat {
            css,
            base,
            conditions,
            look,
            cell_css,
        }
    }

    /// Style layers of a table that apply at a cell position.
    pub fn cell_layers(&self, table: &TableFormat, position: CellPosition) -> StyleLayers {
        let mut layers = table.base.clone();
        for condition in position.conditions(&table.look) {
            if let Some(conditional) = table.conditions.get(&condition) {
                layers.merge(conditional);
            }
        }
        layers
    }

    /// Resolve a row: table style row layer, the row layers of the
    /// conditions that apply to the row, then direct row formatting.
    pub fn row(&self, table: &TableFormat, position: CellPosition, row: &Element) -> CssProps {
        let mut css = table.base.row.clone();
        for condition in position.row_conditions(&table.look) {
            if let Some(conditional) = table.conditions.get(&condition) {
                css.merge(&conditional.row);
            }
        }
        css.merge(&row.css);
        css
    }

    /// Resolve a cell: style layers for its position, table-level cell
    /// properties, then direct cell formatting. Also returns the format its
    /// content inherits.
    pub fn cell(&self, table: &TableFormat, position: CellPosition, cell: &Element) -> (CssProps, CellFormat) {
        let layers = self.cell_layers(table, position);
        let mut css = layers.cell.clone();
        css.merge(&table.cell_css);
        css.merge(&cell.css);
        let content = CellFormat {
            paragraph: layers.paragraph,
            run: layers.run,
        };
        (css, content)
    }
}

/// The class a named style renders as: `{prefix}_{escaped id}`.
pub fn style_class(prefix: &str, style_id: &str) -> String {
    let mut escaped = String::with_capacity(style_id.len());
    let mut last_dash = false;
    for c in style_id.chars() {
        if c == '&' {
            escaped.push_str("and");
            last_dash = false;
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            escaped.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            escaped.push('-');
            last_dash = true;
        }
    }
    format!("{}_{}", prefix, escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NumberingCatalog, ParagraphProps};

    fn css(pairs: &[(&str, &str)]) -> CssProps {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn paragraph_style(id: &str, based_on: Option<&str>, paragraph: CssProps, run: CssProps) -> StyleDefinition {
        StyleDefinition {
            id: id.to_string(),
            style_type: Some(StyleType::Paragraph),
            based_on: based_on.map(String::from),
            layers: StyleLayers {
                paragraph,
                run,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn catalog() -> StyleCatalog {
        let mut styles = StyleCatalog::default();
        styles.defaults.run = css(&[("font-size", "11.00pt"), ("color", "black")]);
        let mut normal = paragraph_style(
            "Normal",
            None,
            css(&[("text-align", "left"), ("margin-bottom", "8.00pt")]),
            css(&[("font-family", "'Calibri'")]),
        );
        normal.is_default = true;
        styles.insert(normal);
        styles.insert(paragraph_style(
            "Quote",
            Some("Normal"),
            css(&[("text-align", "center")]),
            css(&[("font-style", "italic"), ("color", "#404040")]),
        ));
        styles
    }

    fn paragraph(style: Option<&str>, direct: CssProps) -> Element {
        let mut p = Element::new(ElementKind::Paragraph(ParagraphProps::default()));
        p.style_id = style.map(String::from);
        p.css = direct;
        p
    }

    #[test]
    fn test_precedence_direct_over_style_over_parent() {
        let styles = catalog();
        let numbering = NumberingCatalog::default();
        let cascade = Cascade::new(&styles, &numbering);

        let format = cascade.paragraph(&paragraph(Some("Quote"), css(&[("margin-bottom", "0.00pt")])), None);
        // named style beats its parent
        assert_eq!(format.css.get("text-align"), Some("center"));
        // direct beats both
        assert_eq!(format.css.get("margin-bottom"), Some("0.00pt"));
        // run layer: parent, then style, over defaults
        assert_eq!(format.run.get("font-family"), Some("'Calibri'"));
        assert_eq!(format.run.get("color"), Some("#404040"));
        assert_eq!(format.run.get("font-size"), Some("11.00pt"));

        let mut run = Element::text_run("x");
        run.css = css(&[("color", "red")]);
        let run_css = cascade.run(&run, &format.run);
        assert_eq!(run_css.get("color"), Some("red"));
        assert_eq!(run_css.get("font-style"), Some("italic"));
    }

    #[test]
    fn test_default_style_applies_without_reference() {
        let styles = catalog();
        let numbering = NumberingCatalog::default();
        let cascade = Cascade::new(&styles, &numbering);
        let format = cascade.paragraph(&paragraph(None, CssProps::new()), None);
        assert_eq!(format.css.get("text-align"), Some("left"));

        let format = cascade.paragraph(&paragraph(Some("Missing"), CssProps::new()), None);
        assert_eq!(format.css.get("margin-bottom"), Some("8.00pt"));
    }

    #[test]
    fn test_table_cell_layer_sits_below_paragraph_style() {
        let styles = catalog();
        let numbering = NumberingCatalog::default();
        let cascade = Cascade::new(&styles, &numbering);
        let cell = CellFormat {
            paragraph: css(&[("text-align", "right"), ("line-height", "1.00")]),
            run: css(&[("font-weight", "bold"), ("color", "white")]),
        };
        let format = cascade.paragraph(&paragraph(Some("Quote"), CssProps::new()), Some(&cell));
        assert_eq!(format.css.get("text-align"), Some("center"));
        assert_eq!(format.css.get("line-height"), Some("1.00"));
        assert_eq!(format.run.get("font-weight"), Some("bold"));
        assert_eq!(format.run.get("color"), Some("#404040"));
    }

    #[test]
    fn test_conditions_for_positions() {
        let look = TableLook::default();
        let corner = CellPosition { row: 0, col: 0, rows: 3, cols: 3 };
        assert_eq!(
            corner.conditions(&look),
            vec![
                TableCondition::WholeTable,
                TableCondition::FirstCol,
                TableCondition::FirstRow,
                TableCondition::NwCell
            ]
        );

        let body = CellPosition { row: 1, col: 1, rows: 3, cols: 3 };
        assert_eq!(
            body.conditions(&look),
            vec![TableCondition::WholeTable, TableCondition::Band1Horz]
        );
        let next = CellPosition { row: 2, col: 1, rows: 3, cols: 3 };
        assert!(next.conditions(&look).contains(&TableCondition::Band2Horz));
    }

    #[test]
    fn test_table_conditional_formats_layer_in_order() {
        let mut styles = StyleCatalog::default();
        let mut grid = StyleDefinition {
            id: "Grid".to_string(),
            style_type: Some(StyleType::Table),
            ..Default::default()
        };
        grid.layers.cell = css(&[("background-color", "white")]);
        grid.conditions.insert(
            TableCondition::Band1Horz,
            StyleLayers {
                cell: css(&[("background-color", "#EEEEEE")]),
                ..Default::default()
            },
        );
        grid.conditions.insert(
            TableCondition::FirstRow,
            StyleLayers {
                cell: css(&[("background-color", "#4472C4")]),
                run: css(&[("font-weight", "bold")]),
                ..Default::default()
            },
        );
        styles.insert(grid);
        let numbering = NumberingCatalog::default();
        let cascade = Cascade::new(&styles, &numbering);

        let mut table = Element::new(ElementKind::Table(Default::default()));
        table.style_id = Some("Grid".to_string());
        let format = cascade.table(&table);

        let header = CellPosition { row: 0, col: 1, rows: 3, cols: 2 };
        let (cell_css, content) = cascade.cell(&format, header, &Element::new(ElementKind::Run));
        assert_eq!(cell_css.get("background-color"), Some("#4472C4"));
        assert_eq!(content.run.get("font-weight"), Some("bold"));

        let banded = CellPosition { row: 1, col: 1, rows: 3, cols: 2 };
        let mut direct = Element::new(ElementKind::Run);
        let (cell_css, _) = cascade.cell(&format, banded, &direct);
        assert_eq!(cell_css.get("background-color"), Some("#EEEEEE"));

        direct.css = css(&[("background-color", "yellow")]);
        let (cell_css, _) = cascade.cell(&format, banded, &direct);
        assert_eq!(cell_css.get("background-color"), Some("yellow"));
    }

    #[test]
    fn test_row_takes_conditional_row_layers() {
        let mut styles = StyleCatalog::default();
        let mut grid = StyleDefinition {
            id: "Grid".to_string(),
            style_type: Some(StyleType::Table),
            ..Default::default()
        };
        grid.layers.row = css(&[("height", "12.00pt")]);
        grid.conditions.insert(
            TableCondition::FirstRow,
            StyleLayers {
                row: css(&[("height", "24.00pt"), ("break-inside", "avoid")]),
                ..Default::default()
            },
        );
        grid.conditions.insert(
            TableCondition::FirstCol,
            StyleLayers {
                row: css(&[("text-align", "right")]),
                ..Default::default()
            },
        );
        styles.insert(grid);
        let numbering = NumberingCatalog::default();
        let cascade = Cascade::new(&styles, &numbering);

        let mut table = Element::new(ElementKind::Table(Default::default()));
        table.style_id = Some("Grid".to_string());
        let format = cascade.table(&table);
        let row = Element::new(ElementKind::Run);

        let header = cascade.row(&format, CellPosition { row: 0, col: 0, rows: 3, cols: 2 }, &row);
        assert_eq!(header.get("height"), Some("24.00pt"));
        assert_eq!(header.get("break-inside"), Some("avoid"));
        assert_eq!(header.get("text-align"), None);

        let body = cascade.row(&format, CellPosition { row: 1, col: 0, rows: 3, cols: 2 }, &row);
        assert_eq!(body.get("height"), Some("12.00pt"));
    }

    #[test]
    fn test_style_class() {
        assert_eq!(style_class("docx", "Heading1"), "docx_heading1");
        assert_eq!(style_class("docx", "Table Grid"), "docx_table-grid");
        assert_eq!(style_class("docx", "Q&A.Style"), "docx_qanda-style");
    }
}
