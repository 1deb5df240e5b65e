//! Error types for Gridcalc core.

use thiserror::Error;

use gridcalc_engine::engine::{CellRef, ParseError};

/// Errors that can occur while editing, loading or saving a sheet
#[derive(Error, Debug)]
pub enum GridcalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Formula error: {0}")]
    Formula(#[from] ParseError),

    #[error("{name} is not a cell on this sheet")]
    UnknownReference { name: String },

    #[error("Cell {cell} holds {value:?}, which is not a number")]
    NonNumericReference { cell: CellRef, value: String },

    #[error("Cell ({row}, {col}) is outside the sheet")]
    OutOfBounds { row: i64, col: i64 },

    #[error("Invalid sheet configuration: {0}")]
    InvalidConfig(String),

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, GridcalcError>;
