//! Document state and logic (UI-agnostic).

mod eval;
mod events;
mod history;
mod io;
mod ops;
mod state;

pub use events::{CellChange, CellField, ChangeCallback};
pub use history::{Command, CommandHandle};
pub use state::{CellView, Document};
