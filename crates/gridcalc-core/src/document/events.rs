//! Change notifications for rendering layers.

use gridcalc_engine::engine::CellRef;

/// Which part of a cell changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellField {
    Text,
    Value,
    Color,
}

/// Emitted whenever a cell field is written, including by recomputation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub cell: CellRef,
    pub field: CellField,
}

/// Callback type for receiving cell changes.
pub type ChangeCallback = Box<dyn FnMut(&CellChange)>;

#[derive(Default)]
pub(crate) struct Observers {
    callbacks: Vec<ChangeCallback>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, callback: ChangeCallback) {
        self.callbacks.push(callback);
    }

    pub(crate) fn notify(&mut self, cell: &CellRef, field: CellField) {
        if self.callbacks.is_empty() {
            return;
        }
        let change = CellChange {
            cell: cell.clone(),
            field,
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}
