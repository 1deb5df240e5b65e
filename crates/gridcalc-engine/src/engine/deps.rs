//! Dependency graph between formula cells.
//!
//! Edges point from a formula cell to the cells its formula needs. A reverse
//! index ("needed by") is kept in step so cascades never rescan the whole
//! map. Walks use explicit worklists and visited sets, so they terminate even
//! when the graph already holds a cycle.

use std::collections::{BTreeSet, HashMap, VecDeque};

use super::cell_ref::CellRef;

#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    /// cell -> cells its formula needs
    needs: HashMap<CellRef, BTreeSet<CellRef>>,
    /// cell -> cells whose formulas need it
    needed_by: HashMap<CellRef, BTreeSet<CellRef>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every edge of `cell` with `dependencies`.
    /// An empty set leaves no entry for the cell.
    pub fn replace<I>(&mut self, cell: &CellRef, dependencies: I)
    where
        I: IntoIterator<Item = CellRef>,
    {
        self.remove(cell);
        let dependencies: BTreeSet<CellRef> = dependencies.into_iter().collect();
        if dependencies.is_empty() {
            return;
        }
        for dep in &dependencies {
            self.needed_by
                .entry(dep.clone())
                .or_default()
                .insert(cell.clone());
        }
        self.needs.insert(cell.clone(), dependencies);
    }

    /// Drop every edge going out of `cell`.
    pub fn remove(&mut self, cell: &CellRef) {
        let Some(old) = self.needs.remove(cell) else {
            return;
        };
        for dep in old {
            if let Some(users) = self.needed_by.get_mut(&dep) {
                users.remove(cell);
                if users.is_empty() {
                    self.needed_by.remove(&dep);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.needs.clear();
        self.needed_by.clear();
    }

    /// Cells the formula in `cell` needs.
    pub fn dependencies(&self, cell: &CellRef) -> impl Iterator<Item = &CellRef> {
        self.needs.get(cell).into_iter().flatten()
    }

    /// Cells whose formulas directly need `cell`.
    pub fn dependents(&self, cell: &CellRef) -> impl Iterator<Item = &CellRef> {
        self.needed_by.get(cell).into_iter().flatten()
    }

    pub fn has_dependencies(&self, cell: &CellRef) -> bool {
        self.needs.contains_key(cell)
    }

    /// Number of cells with at least one edge.
    pub fn len(&self) -> usize {
        self.needs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.needs.values().map(BTreeSet::len).sum()
    }

    /// Every cell that needs `cell`, directly or through other cells.
    /// `cell` itself is only included when it sits on a cycle.
    pub fn transitive_dependents(&self, cell: &CellRef) -> BTreeSet<CellRef> {
        let mut visited = BTreeSet::new();
        let mut queue: VecDeque<&CellRef> = self.dependents(cell).collect();
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            queue.extend(self.dependents(current));
        }
        visited
    }

    /// Order in which the dependents of `changed` must be recomputed.
    ///
    /// A cell comes after every dependency it has inside the affected set.
    /// Cells that can never become ready because they sit on (or behind) a
    /// cycle are appended last in row-major order.
    pub fn recalc_order(&self, changed: &CellRef) -> Vec<CellRef> {
        let mut affected = self.transitive_dependents(changed);
        affected.remove(changed);

        let mut pending: HashMap<&CellRef, usize> = affected
            .iter()
            .map(|cell| {
                let waiting = self
                    .dependencies(cell)
                    .filter(|dep| affected.contains(*dep))
                    .count();
                (cell, waiting)
            })
            .collect();

        let mut ready: VecDeque<&CellRef> = affected
            .iter()
            .filter(|cell| pending.get(cell) == Some(&0))
            .collect();
        let mut order = Vec::with_capacity(affected.len());
        let mut settled = BTreeSet::new();

        while let Some(cell) = ready.pop_front() {
            order.push(cell.clone());
            settled.insert(cell);
            for user in self.dependents(cell) {
                if let Some(waiting) = pending.get_mut(user) {
                    *waiting = waiting.saturating_sub(1);
                    if *waiting == 0 && !settled.contains(user) {
                        ready.push_back(user);
                    }
                }
            }
        }

        for cell in &affected {
            if !settled.contains(cell) {
                order.push(cell.clone());
            }
        }
        order
    }
}
