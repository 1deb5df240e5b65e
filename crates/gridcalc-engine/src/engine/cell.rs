//! Cell data structures for the spreadsheet grid.
//!
//! - [`Cell`] - raw text, computed display value and background color
//! - [`Grid`] - dense, fixed-size storage created once per sheet

use super::cell_ref::CellRef;

/// Background color of an untouched cell (opaque white, ARGB).
pub const DEFAULT_COLOR: u32 = 0xFFFF_FFFF;

/// Display value of a formula whose references loop back to it.
pub const CIRCULAR_REF: &str = "#CIRCULAR_REF!";

/// Display value of a formula that names its own cell.
pub const SELF_REF: &str = "#SELF_REF!";

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// What the user typed.
    pub text: String,
    /// What is shown: the text itself, a formula result, or a sentinel.
    pub value: String,
    pub color: u32,
}

impl Cell {
    pub fn new() -> Cell {
        Cell {
            text: String::new(),
            value: String::new(),
            color: DEFAULT_COLOR,
        }
    }

    /// The expression after the leading `=`, if the text is a formula.
    pub fn formula(&self) -> Option<&str> {
        self.text.strip_prefix('=')
    }

    pub fn is_formula(&self) -> bool {
        self.formula().is_some()
    }

    /// True if the cell differs from a freshly created one in text or color.
    pub fn is_modified(&self) -> bool {
        !self.text.is_empty() || self.color != DEFAULT_COLOR
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-size grid of cells, stored row-major.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Grid {
        Grid {
            rows,
            cols,
            cells: vec![Cell::new(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.row < self.rows && cell_ref.col < self.cols
    }

    fn index(&self, cell_ref: &CellRef) -> Option<usize> {
        self.contains(cell_ref)
            .then(|| cell_ref.row * self.cols + cell_ref.col)
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&Cell> {
        self.index(cell_ref).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, cell_ref: &CellRef) -> Option<&mut Cell> {
        self.index(cell_ref).map(|i| &mut self.cells[i])
    }

    /// All cells with their positions, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &Cell)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (CellRef::new(i % cols, i / cols), cell))
    }

    /// Cells that differ from their initial state, row-major.
    pub fn modified(&self) -> impl Iterator<Item = (CellRef, &Cell)> {
        self.iter().filter(|(_, cell)| cell.is_modified())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_detection() {
        let mut cell = Cell::new();
        cell.text = "=A1+1".to_string();
        assert_eq!(cell.formula(), Some("A1+1"));
        cell.text = "A1+1".to_string();
        assert!(!cell.is_formula());
    }

    #[test]
    fn test_modified_by_text_or_color() {
        let mut cell = Cell::new();
        assert!(!cell.is_modified());
        cell.color = 0xFF00_FF00;
        assert!(cell.is_modified());
        cell.color = DEFAULT_COLOR;
        cell.text = "x".to_string();
        assert!(cell.is_modified());
    }

    #[test]
    fn test_grid_bounds() {
        let mut grid = Grid::new(3, 2);
        assert!(grid.get(&CellRef::new(1, 2)).is_some());
        assert!(grid.get(&CellRef::new(2, 0)).is_none());
        assert!(grid.get(&CellRef::new(0, 3)).is_none());

        grid.get_mut(&CellRef::new(1, 2)).unwrap().text = "hi".to_string();
        let modified: Vec<_> = grid.modified().map(|(r, _)| r).collect();
        assert_eq!(modified, vec![CellRef::new(1, 2)]);
    }
}
