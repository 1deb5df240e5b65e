use crate::config::SheetConfig;
use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::{Cell, CellRef, DependencyGraph, Grid};
use std::path::PathBuf;

use super::events::{CellField, ChangeCallback, Observers};
use super::history::History;

/// Read-only snapshot of a cell, handed to UI layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    pub cell: CellRef,
    pub text: String,
    pub value: String,
    pub color: u32,
}

/// UI-agnostic document state for one sheet.
///
/// The document owns the grid, the dependency graph and the history; nothing
/// is shared between documents.
pub struct Document {
    /// The cells, created once and never removed
    pub(crate) grid: Grid,
    /// formula cell -> cells it needs, plus the reverse index
    pub(crate) graph: DependencyGraph,
    /// Undo/redo stacks
    pub(crate) history: History,
    pub(crate) observers: Observers,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the sheet changed since it was last loaded or saved
    pub modified: bool,
}

impl Document {
    /// Create an empty sheet with the default size (50 rows, columns A-Z).
    pub fn new() -> Self {
        Self::build(SheetConfig::default())
    }

    pub fn with_config(config: SheetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create a document and load a file if provided.
    /// A path that does not exist yet just becomes the save target.
    pub fn with_file(path: Option<PathBuf>, config: SheetConfig) -> Result<Self> {
        let mut doc = Self::with_config(config)?;
        if let Some(p) = path {
            if p.exists() {
                doc.load_file(&p)?;
            } else {
                doc.file_path = Some(p);
            }
        }
        Ok(doc)
    }

    fn build(config: SheetConfig) -> Self {
        Document {
            grid: Grid::new(config.rows, config.cols),
            graph: DependencyGraph::new(),
            history: History::new(config.undo_limit),
            observers: Observers::default(),
            file_path: None,
            modified: false,
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Snapshot of the cell at (row, col); `None` when outside the sheet.
    pub fn get_cell(&self, row: i64, col: i64) -> Option<CellView> {
        let cell_ref = CellRef::from_coords(row, col)?;
        let cell = self.grid.get(&cell_ref)?;
        Some(CellView {
            cell: cell_ref,
            text: cell.text.clone(),
            value: cell.value.clone(),
            color: cell.color,
        })
    }

    pub fn cell(&self, cell_ref: &CellRef) -> Option<&Cell> {
        self.grid.get(cell_ref)
    }

    /// Display value of a cell, empty for cells outside the sheet.
    pub fn cell_display(&self, cell_ref: &CellRef) -> &str {
        self.grid.get(cell_ref).map_or("", |cell| cell.value.as_str())
    }

    /// Cells the formula in `cell_ref` currently needs, row-major.
    pub fn dependencies_of(&self, cell_ref: &CellRef) -> Vec<CellRef> {
        self.graph.dependencies(cell_ref).cloned().collect()
    }

    /// Cells whose formulas directly need `cell_ref`, row-major.
    pub fn dependents_of(&self, cell_ref: &CellRef) -> Vec<CellRef> {
        self.graph.dependents(cell_ref).cloned().collect()
    }

    /// Register an observer for every cell field write.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&super::CellChange) + 'static,
    {
        let callback: ChangeCallback = Box::new(callback);
        self.observers.subscribe(callback);
    }

    pub(crate) fn locate(&self, row: i64, col: i64) -> Result<CellRef> {
        CellRef::from_coords(row, col)
            .filter(|cell_ref| self.grid.contains(cell_ref))
            .ok_or(GridcalcError::OutOfBounds { row, col })
    }

    pub(crate) fn set_value(&mut self, cell_ref: &CellRef, value: String) {
        if let Some(cell) = self.grid.get_mut(cell_ref) {
            cell.value = value;
            self.observers.notify(cell_ref, CellField::Value);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_sizes_the_sheet() {
        let config = SheetConfig {
            rows: 4,
            cols: 2,
            undo_limit: 1,
        };
        let mut doc = Document::with_config(config).unwrap();
        assert_eq!((doc.rows(), doc.cols()), (4, 2));
        assert!(doc.get_cell(3, 1).is_some());
        assert!(doc.get_cell(4, 0).is_none());

        doc.set_cell_text(0, 0, "1").unwrap();
        doc.set_cell_text(0, 0, "2").unwrap();
        doc.undo().unwrap();
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SheetConfig {
            rows: 0,
            ..SheetConfig::default()
        };
        assert!(matches!(
            Document::with_config(config),
            Err(GridcalcError::InvalidConfig(_))
        ));
    }
}
