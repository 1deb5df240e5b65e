use super::events::CellField;
use super::history::{Command, CommandHandle};
use super::Document;
use crate::error::Result;
use gridcalc_engine::engine::CellRef;
use log::debug;

impl Document {
    /// Replace the text of the cell at (row, col) and recompute everything
    /// that depends on it.
    ///
    /// The edit is recorded even when the new formula fails to evaluate: the
    /// text did change and undo must be able to revert it. In that case the
    /// evaluation error is returned and the handle is lost.
    pub fn set_cell_text(&mut self, row: i64, col: i64, text: &str) -> Result<CommandHandle> {
        let cell_ref = self.locate(row, col)?;
        let old = self
            .grid
            .get(&cell_ref)
            .map(|cell| cell.text.clone())
            .unwrap_or_default();
        let command = Command::ChangeText {
            cell: cell_ref.clone(),
            old,
            new: text.to_string(),
        };
        debug!("{}: set text {:?}", cell_ref, text);
        let result = command.execute(self);
        let handle = self.history.record(command);
        self.modified = true;
        result.map(|()| handle)
    }

    /// Change the background color of the cell at (row, col). Colors never
    /// take part in recomputation.
    pub fn set_cell_color(&mut self, row: i64, col: i64, color: u32) -> Result<CommandHandle> {
        let cell_ref = self.locate(row, col)?;
        let old = self
            .grid
            .get(&cell_ref)
            .map(|cell| cell.color)
            .unwrap_or_default();
        let command = Command::ChangeColor {
            cell: cell_ref.clone(),
            old,
            new: color,
        };
        debug!("{}: set color {:08X}", cell_ref, color);
        command.execute(self)?;
        self.modified = true;
        Ok(self.history.record(command))
    }

    /// Set the text of a cell without recording it in the history.
    pub fn set_cell_text_direct(&mut self, row: i64, col: i64, text: &str) -> Result<()> {
        let cell_ref = self.locate(row, col)?;
        self.modified = true;
        self.write_text(&cell_ref, text)
    }

    /// Revert the most recent command. Returns the handle of the reverted
    /// command, or `None` when there was nothing to undo.
    pub fn undo(&mut self) -> Result<Option<CommandHandle>> {
        let Some(entry) = self.history.pop_undo() else {
            return Ok(None);
        };
        debug!("undo {} on {}", entry.command.description(), entry.command.cell());
        let result = entry.command.unexecute(self);
        let handle = entry.handle;
        self.history.push_redo(entry);
        self.modified = true;
        result.map(|()| Some(handle))
    }

    /// Re-apply the most recently undone command.
    pub fn redo(&mut self) -> Result<Option<CommandHandle>> {
        let Some(entry) = self.history.pop_redo() else {
            return Ok(None);
        };
        debug!("redo {} on {}", entry.command.description(), entry.command.cell());
        let result = entry.command.execute(self);
        let handle = entry.handle;
        self.history.push_undo(entry);
        self.modified = true;
        result.map(|()| Some(handle))
    }

    pub fn can_undo(&self) -> bool {
        self.history.undo_len() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.history.redo_len() > 0
    }

    /// Description of the command `undo` would revert, e.g. "Change Text".
    pub fn peek_undo_description(&self) -> Option<&'static str> {
        self.history.peek_undo().map(Command::description)
    }

    pub fn peek_redo_description(&self) -> Option<&'static str> {
        self.history.peek_redo().map(Command::description)
    }

    pub(crate) fn write_text(&mut self, cell_ref: &CellRef, text: &str) -> Result<()> {
        let Some(cell) = self.grid.get_mut(cell_ref) else {
            return Ok(());
        };
        cell.text = text.to_string();
        self.observers.notify(cell_ref, CellField::Text);
        self.recompute(cell_ref)
    }

    pub(crate) fn write_color(&mut self, cell_ref: &CellRef, color: u32) {
        if let Some(cell) = self.grid.get_mut(cell_ref) {
            cell.color = color;
            self.observers.notify(cell_ref, CellField::Color);
        }
    }
}
