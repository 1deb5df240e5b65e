//! Reversible cell edits and the undo/redo stacks.
//!
//! Every fresh edit clears the redo stack, so history stays linear.

use std::collections::VecDeque;

use gridcalc_engine::engine::CellRef;

use super::Document;
use crate::error::Result;

/// A single reversible change to one field of one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    ChangeText {
        cell: CellRef,
        old: String,
        new: String,
    },
    ChangeColor {
        cell: CellRef,
        old: u32,
        new: u32,
    },
}

impl Command {
    pub fn cell(&self) -> &CellRef {
        match self {
            Command::ChangeText { cell, .. } | Command::ChangeColor { cell, .. } => cell,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::ChangeText { .. } => "Change Text",
            Command::ChangeColor { .. } => "Change Color",
        }
    }

    /// Apply the new value.
    pub(crate) fn execute(&self, doc: &mut Document) -> Result<()> {
        match self {
            Command::ChangeText { cell, new, .. } => doc.write_text(cell, new),
            Command::ChangeColor { cell, new, .. } => {
                doc.write_color(cell, *new);
                Ok(())
            }
        }
    }

    /// Restore the old value.
    pub(crate) fn unexecute(&self, doc: &mut Document) -> Result<()> {
        match self {
            Command::ChangeText { cell, old, .. } => doc.write_text(cell, old),
            Command::ChangeColor { cell, old, .. } => {
                doc.write_color(cell, *old);
                Ok(())
            }
        }
    }
}

/// Identifies a recorded command for as long as it stays in history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommandHandle(u64);

impl CommandHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

pub(crate) struct Entry {
    pub(crate) handle: CommandHandle,
    pub(crate) command: Command,
}

pub(crate) struct History {
    undo: VecDeque<Entry>,
    redo: Vec<Entry>,
    limit: usize,
    next_id: u64,
}

impl History {
    pub(crate) fn new(limit: usize) -> Self {
        History {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
            next_id: 0,
        }
    }

    /// Record an already executed command.
    pub(crate) fn record(&mut self, command: Command) -> CommandHandle {
        let handle = CommandHandle(self.next_id);
        self.next_id += 1;
        self.redo.clear();
        self.undo.push_back(Entry { handle, command });
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        handle
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Entry> {
        self.undo.pop_back()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Entry> {
        self.redo.pop()
    }

    pub(crate) fn push_undo(&mut self, entry: Entry) {
        self.undo.push_back(entry);
    }

    pub(crate) fn push_redo(&mut self, entry: Entry) {
        self.redo.push(entry);
    }

    pub(crate) fn peek_undo(&self) -> Option<&Command> {
        self.undo.back().map(|entry| &entry.command)
    }

    pub(crate) fn peek_redo(&self) -> Option<&Command> {
        self.redo.last().map(|entry| &entry.command)
    }

    pub(crate) fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub(crate) fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
