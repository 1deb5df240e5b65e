//! gridcalc-core - UI-agnostic document model + storage.

pub mod config;
pub mod document;
pub mod error;
pub mod storage;

pub use config::SheetConfig;
pub use document::{CellChange, CellField, CellView, CommandHandle, Document};
pub use error::{GridcalcError, Result};
pub use storage::CellRecord;

pub use gridcalc_engine::engine::CellRef;
