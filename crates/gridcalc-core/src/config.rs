//! Sheet configuration.

use serde::Deserialize;

use crate::error::{GridcalcError, Result};

/// Column names are a single letter, so a sheet has at most 26 columns.
pub const MAX_COLUMNS: usize = 26;

/// Size and history settings for a [`Document`](crate::Document).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    pub rows: usize,
    pub cols: usize,
    /// Maximum number of undo entries kept; the oldest are dropped first.
    pub undo_limit: usize,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            rows: 50,
            cols: MAX_COLUMNS,
            undo_limit: 100,
        }
    }
}

impl SheetConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 {
            return Err(GridcalcError::InvalidConfig(
                "a sheet needs at least one row".to_string(),
            ));
        }
        if self.cols == 0 || self.cols > MAX_COLUMNS {
            return Err(GridcalcError::InvalidConfig(format!(
                "cols must be between 1 and {}, got {}",
                MAX_COLUMNS, self.cols
            )));
        }
        Ok(())
    }
}
