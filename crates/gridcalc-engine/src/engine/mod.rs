//! Spreadsheet engine API.
//!
//! This module provides the computation pieces a sheet is built from:
//!
//! - [`Cell`], [`Grid`] - Cell storage
//! - [`CellRef`] - Cell names (A1 notation) to row/col indices and back
//! - [`OPERATORS`] - The closed operator table
//! - [`to_postfix`] - Shunting-yard conversion of infix formulas
//! - [`ExpressionTree`] - Expression trees and their evaluation
//! - [`DependencyGraph`] - Which formula needs which cell
//! - [`creates_cycle`] - Circular reference detection
//! - [`format_number`] - Display formatting of results

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod format;
mod operator;
mod parser;
mod tree;

pub use cell::{CIRCULAR_REF, Cell, DEFAULT_COLOR, Grid, SELF_REF};
pub use cell_ref::CellRef;
pub use cycle::{creates_cycle, cycle_path};
pub use deps::DependencyGraph;
pub use format::format_number;
pub use operator::{Associativity, OPERATORS, Operator, OperatorSpec};
pub use parser::{ParseError, Token, to_postfix};
pub use tree::{ExpressionTree, Node, NodeId, evaluate_expression};
