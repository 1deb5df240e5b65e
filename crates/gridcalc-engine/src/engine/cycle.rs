//! Circular reference detection for formula cells.
//!
//! Before a formula's edges are installed we check whether any cell it
//! references already needs the formula's own cell, directly or through a
//! chain (A1 references B1, B1 references C1, C1 references A1). The check
//! runs against the graph with the cell's stale edges already removed, so the
//! candidate edge set is what gets tested.

use std::collections::{HashMap, VecDeque};

use super::{CellRef, DependencyGraph};

/// Whether giving `cell` the edges `references` would close a loop.
///
/// A direct self-reference is not reported here; callers treat that case on
/// its own.
pub fn creates_cycle(graph: &DependencyGraph, cell: &CellRef, references: &[CellRef]) -> bool {
    let reachable = graph.transitive_dependents(cell);
    references
        .iter()
        .any(|reference| reference != cell && reachable.contains(reference))
}

/// The chain `cell -> reference -> ... -> cell` that a new edge from `cell`
/// to `reference` would close, if there is one.
pub fn cycle_path(
    graph: &DependencyGraph,
    cell: &CellRef,
    reference: &CellRef,
) -> Option<Vec<CellRef>> {
    // Breadth-first search over "needed by" edges from `cell` to `reference`.
    let mut came_from: HashMap<&CellRef, &CellRef> = HashMap::new();
    let mut queue: VecDeque<&CellRef> = VecDeque::from([cell]);

    while let Some(current) = queue.pop_front() {
        for user in graph.dependents(current) {
            if user == cell || came_from.contains_key(user) {
                continue;
            }
            came_from.insert(user, current);
            if user == reference {
                let mut path = vec![cell.clone()];
                let mut step = user;
                while step != cell {
                    path.push(step.clone());
                    step = came_from[step];
                }
                path.push(cell.clone());
                return Some(path);
            }
            queue.push_back(user);
        }
    }
    None
}
