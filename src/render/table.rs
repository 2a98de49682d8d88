//! Table grid layout.
//!
//! Resolves `w:gridBefore`/`w:gridAfter`, `w:gridSpan`, legacy `w:hMerge`
//! and `w:vMerge` into placed cells. Cells covered by another cell's span
//! are never placed.

use crate::model::{CellProps, Element, ElementKind, RowProps, VMerge};
use std::collections::HashSet;

/// A cell that is emitted, with its grid position and spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedCell {
    pub row: usize,
    pub col: usize,
    pub colspan: usize,
    pub rowspan: usize,
    /// Index of the cell element within its row
    pub index: usize,
}

/// The placed cells of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLayout {
    pub cells: Vec<PlacedCell>,
    pub rows: usize,
    pub columns: usize,
}

impl TableLayout {
    /// Placed cells of one row, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &PlacedCell> {
        self.cells.iter().filter(move |c| c.row == row)
    }

    /// The placed cell covering a grid position, if any.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&PlacedCell> {
        self.cells.iter().find(|c| {
            row >= c.row && row < c.row + c.rowspan && col >= c.col && col < c.col + c.colspan
        })
    }
}

/// Row elements of a table.
pub fn rows(table: &Element) -> impl Iterator<Item = (&Element, &RowProps)> {
    table.children.iter().filter_map(|row| match &row.kind {
        ElementKind::TableRow(props) => Some((row, props)),
        _ => None,
    })
}

fn cell_props(cell: &Element) -> Option<&CellProps> {
    match &cell.kind {
        ElementKind::TableCell(props) => Some(props),
        _ => None,
    }
}

/// Place every cell of a table on its grid.
pub fn layout_table(table: &Element) -> TableLayout {
    let mut layout = TableLayout::default();
    let mut occupied: HashSet<(usize, usize)> = HashSet::new();

    for (r, (row, row_props)) in rows(table).enumerate() {
        let mut col = row_props.grid_before as usize;
        // index into layout.cells of the last cell placed in this row
        let mut last_placed: Option<usize> = None;

        for (index, cell) in row.children.iter().enumerate() {
            let Some(props) = cell_props(cell) else {
                continue;
            };

            if props.grid_span == 0 {
                // hMerge continuation widens the cell to its left
                if let Some(last) = last_placed {
                    let placed = &mut layout.cells[last];
                    for rr in placed.row..placed.row + placed.rowspan {
                        occupied.insert((rr, placed.col + placed.colspan));
                    }
                    placed.colspan += 1;
                    col += 1;
                    continue;
                }
            }
            let span = props.grid_span.max(1) as usize;

            while occupied.contains(&(r, col)) {
                col += 1;
            }

            if props.v_merge == Some(VMerge::Continue) && r > 0 {
                let origin = layout
                    .cells
                    .iter()
                    .position(|c| c.col == col && c.row + c.rowspan == r);
                if let Some(origin) = origin {
                    let placed = &mut layout.cells[origin];
                    placed.rowspan += 1;
                    for c in placed.col..placed.col + placed.colspan {
                        occupied.insert((r, c));
                    }
                    col += placed.colspan.max(span);
                    last_placed = None;
                    continue;
                }
            }

            for c in col..col + span {
                occupied.insert((r, c));
            }
            layout.cells.push(PlacedCell {
                row: r,
                col,
                colspan: span,
                rowspan: 1,
                index,
            });
            last_placed = Some(layout.cells.len() - 1);
            col += span;
        }

        layout.columns = layout
            .columns
            .max(col + row_props.grid_after as usize);
        layout.rows = r + 1;
    }

    layout.columns = layout.columns.max(
        occupied
            .iter()
            .map(|(_, c)| c + 1)
            .max()
            .unwrap_or(0),
    );
    layout
}

/// Effective column widths: the table grid, with single-column cell
/// widths filling in columns the grid leaves undefined.
pub fn column_widths(table: &Element, layout: &TableLayout) -> Vec<Option<String>> {
    let grid: &[String] = match &table.kind {
        ElementKind::Table(props) => &props.grid,
        _ => &[],
    };

    let columns = layout.columns.max(grid.len());
    let mut widths: Vec<Option<String>> = (0..columns)
        .map(|i| grid.get(i).filter(|w| !is_zero_width(w)).cloned())
        .collect();

    let rows: Vec<&Element> = rows(table).map(|(row, _)| row).collect();
    for placed in layout.cells.iter().filter(|c| c.colspan == 1) {
        if widths[placed.col].is_some() {
            continue;
        }
        let width = rows
            .get(placed.row)
            .and_then(|row| row.children.get(placed.index))
            .and_then(cell_props)
            .and_then(|props| props.width.clone());
        if let Some(width) = width {
            widths[placed.col] = Some(width);
        }
    }
    widths
}

fn is_zero_width(width: &str) -> bool {
    width
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
        .parse::<f64>()
        .map(|v| v == 0.0)
        .unwrap_or(true)
}
