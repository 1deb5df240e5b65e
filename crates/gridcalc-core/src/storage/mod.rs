//! Persistence formats: `.grd` records and markdown export.

pub mod md;
pub mod parser;
pub mod writer;

use gridcalc_engine::engine::DEFAULT_COLOR;

pub use md::{markdown_content, write_markdown};
pub use parser::{parse_grd, parse_grd_content};
pub use writer::{write_grd, write_grd_content};

/// One persisted cell: its name (e.g. `B7`), raw text and background color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellRecord {
    pub name: String,
    pub text: String,
    pub color: u32,
}

impl CellRecord {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        CellRecord {
            name: name.into(),
            text: text.into(),
            color: DEFAULT_COLOR,
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}
