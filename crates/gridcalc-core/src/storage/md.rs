//! Markdown export functionality

use crate::document::Document;
use gridcalc_engine::engine::CellRef;
use std::fmt::Write as _;
use std::path::Path;

/// Write the display values of the sheet to a markdown file
pub fn write_markdown(path: &Path, doc: &Document) -> std::io::Result<()> {
    std::fs::write(path, markdown_content(doc))
}

/// Render the sheet as a markdown table covering every cell that is not in
/// its initial state.
pub fn markdown_content(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str("# Sheet\n\n");

    let Some((min_row, min_col, max_row, max_col)) = find_grid_bounds(doc) else {
        out.push_str("*Empty spreadsheet*\n");
        return out;
    };

    // Header with column letters
    out.push_str("|   |");
    for col in min_col..=max_col {
        let _ = write!(out, " {} |", CellRef::col_to_letters(col));
    }
    out.push('\n');

    out.push_str("|---|");
    for _ in min_col..=max_col {
        out.push_str("---|");
    }
    out.push('\n');

    for row in min_row..=max_row {
        let _ = write!(out, "| {} |", row + 1); // 1-based row numbers
        for col in min_col..=max_col {
            let display = doc.cell_display(&CellRef::new(col, row));
            let _ = write!(out, " {} |", escape_markdown(display));
        }
        out.push('\n');
    }

    out
}

/// Bounds (min_row, min_col, max_row, max_col) of the modified cells
fn find_grid_bounds(doc: &Document) -> Option<(usize, usize, usize, usize)> {
    doc.grid.modified().fold(None, |bounds, (cell_ref, _)| {
        let (min_row, min_col, max_row, max_col) =
            bounds.unwrap_or((cell_ref.row, cell_ref.col, cell_ref.row, cell_ref.col));
        Some((
            min_row.min(cell_ref.row),
            min_col.min(cell_ref.col),
            max_row.max(cell_ref.row),
            max_col.max(cell_ref.col),
        ))
    })
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
