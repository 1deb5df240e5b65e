use super::events::CellField;
use super::Document;
use crate::error::{GridcalcError, Result};
use crate::storage::{CellRecord, parse_grd, parse_grd_content, write_grd, write_grd_content};
use gridcalc_engine::engine::{CellRef, DEFAULT_COLOR};
use log::{debug, warn};
use rand::Rng;
use std::path::{Path, PathBuf};

/// Rows filled by the demo.
const DEMO_ROWS: usize = 50;
const DEMO_GREETINGS: usize = 50;

impl Document {
    /// Every cell that differs from its initial state, row-major.
    pub fn records(&self) -> Vec<CellRecord> {
        self.grid
            .modified()
            .map(|(cell_ref, cell)| CellRecord {
                name: cell_ref.to_string(),
                text: cell.text.clone(),
                color: cell.color,
            })
            .collect()
    }

    /// Replace the whole sheet with `records`.
    ///
    /// Every name is checked before anything changes, so a record outside the
    /// sheet leaves the document untouched. Formulas that fail to evaluate are
    /// kept as text and logged. History is emptied.
    pub fn load_records(&mut self, records: &[CellRecord]) -> Result<()> {
        let cells = records
            .iter()
            .map(|record| {
                CellRef::from_str(&record.name)
                    .filter(|cell_ref| self.grid.contains(cell_ref))
                    .ok_or_else(|| GridcalcError::UnknownReference {
                        name: record.name.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        self.clear();
        for (cell_ref, record) in cells.iter().zip(records) {
            self.write_color(cell_ref, record.color);
            if let Err(err) = self.write_text(cell_ref, &record.text) {
                warn!("{}: {}", cell_ref, err);
            }
        }
        debug!("loaded {} cells", records.len());

        self.history.clear();
        self.modified = false;
        Ok(())
    }

    /// Reset every cell to its initial state and forget all edges and
    /// history.
    pub fn clear(&mut self) {
        let modified: Vec<CellRef> = self.grid.modified().map(|(cell_ref, _)| cell_ref).collect();
        for cell_ref in &modified {
            if let Some(cell) = self.grid.get_mut(cell_ref) {
                cell.text.clear();
                cell.value.clear();
                cell.color = DEFAULT_COLOR;
            }
            self.observers.notify(cell_ref, CellField::Text);
            self.observers.notify(cell_ref, CellField::Value);
            self.observers.notify(cell_ref, CellField::Color);
        }
        self.graph.clear();
        self.history.clear();
        if !modified.is_empty() {
            self.modified = true;
        }
    }

    pub fn save_to_string(&self) -> String {
        write_grd_content(&self.records())
    }

    pub fn load_from_str(&mut self, content: &str) -> Result<()> {
        let records = parse_grd_content(content)?;
        self.load_records(&records)
    }

    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = &self.file_path else {
            return Err(GridcalcError::NoFilePath);
        };

        write_grd(path, &self.records())?;
        self.modified = false;
        Ok(path.clone())
    }

    /// Save to `path` and make it the current file path.
    pub fn save_file_as(&mut self, path: &Path) -> Result<PathBuf> {
        self.file_path = Some(path.to_path_buf());
        self.save_file()
    }

    /// Load from file
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let records = parse_grd(path)?;
        self.load_records(&records)?;
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Fill the sheet with demo content, bypassing history.
    ///
    /// Scatters "Hello" over columns C onwards, writes the row number into
    /// column B and `=B<n>*2` into column A, so column A shows twice its row
    /// number.
    pub fn populate_demo<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let rows = self.rows().min(DEMO_ROWS);
        let cols = self.cols();

        if cols > 2 {
            for _ in 0..DEMO_GREETINGS {
                let row = rng.gen_range(0..rows);
                let col = rng.gen_range(2..cols);
                self.set_cell_text_direct(row as i64, col as i64, "Hello")?;
            }
        }
        if cols > 1 {
            for row in 0..rows {
                self.set_cell_text_direct(row as i64, 1, &(row + 1).to_string())?;
            }
        }
        for row in 0..rows {
            self.set_cell_text_direct(row as i64, 0, &format!("=B{}*2", row + 1))?;
        }
        Ok(())
    }
}
