use super::Document;
use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::{
    CIRCULAR_REF, CellRef, ExpressionTree, SELF_REF, creates_cycle, cycle_path, format_number,
};
use log::{debug, trace, warn};
use std::collections::HashSet;

/// How evaluating one cell ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    /// The cell holds a fresh value; its dependents must follow.
    Settled,
    Circular,
    SelfReference,
}

impl Document {
    /// Recompute after the text of `cell_ref` changed, then cascade to every
    /// cell that depends on it.
    ///
    /// The stale edges of the cell are dropped first, so a formula that fails
    /// leaves the cell with no edges and triggers no dependents.
    pub(crate) fn recompute(&mut self, cell_ref: &CellRef) -> Result<()> {
        self.graph.remove(cell_ref);
        match self.evaluate_cell(cell_ref)? {
            Outcome::Settled => self.cascade(cell_ref),
            Outcome::Circular | Outcome::SelfReference => Ok(()),
        }
    }

    fn evaluate_cell(&mut self, cell_ref: &CellRef) -> Result<Outcome> {
        let Some(text) = self.grid.get(cell_ref).map(|cell| cell.text.clone()) else {
            return Ok(Outcome::Settled);
        };
        let Some(formula) = text.strip_prefix('=') else {
            self.set_value(cell_ref, text);
            return Ok(Outcome::Settled);
        };

        let mut tree = ExpressionTree::parse(formula)?;
        let references = self.resolve_references(&tree.variable_names())?;
        let cells: Vec<CellRef> = references.iter().map(|(_, r)| r.clone()).collect();

        // Sentinel outcomes still record their edges so the loop is found
        // again from whichever cell on it is edited next.
        if creates_cycle(&self.graph, cell_ref, &cells) {
            if let Some(path) = cells
                .iter()
                .find_map(|r| cycle_path(&self.graph, cell_ref, r))
            {
                let path: Vec<String> = path.iter().map(|c| c.to_string()).collect();
                warn!("circular reference: {}", path.join(" -> "));
            }
            self.graph.replace(cell_ref, cells);
            self.set_value(cell_ref, CIRCULAR_REF.to_string());
            return Ok(Outcome::Circular);
        }
        if cells.contains(cell_ref) {
            warn!("{} refers to itself", cell_ref);
            self.graph.replace(cell_ref, cells);
            self.set_value(cell_ref, SELF_REF.to_string());
            return Ok(Outcome::SelfReference);
        }

        for (name, reference) in &references {
            let value = self.numeric_value(reference)?;
            tree.set_variable(name, value);
        }
        let result = tree.evaluate();
        self.set_value(cell_ref, format_number(result));
        self.graph.replace(cell_ref, cells);
        Ok(Outcome::Settled)
    }

    /// Map each variable name of a formula to the cell it names.
    fn resolve_references(&self, names: &[String]) -> Result<Vec<(String, CellRef)>> {
        names
            .iter()
            .map(|name| {
                CellRef::from_str(name)
                    .filter(|cell_ref| self.grid.contains(cell_ref))
                    .map(|cell_ref| (name.clone(), cell_ref))
                    .ok_or_else(|| GridcalcError::UnknownReference { name: name.clone() })
            })
            .collect()
    }

    /// The number a referenced cell contributes: 0 when empty.
    fn numeric_value(&self, cell_ref: &CellRef) -> Result<f64> {
        let value = self.cell_display(cell_ref).trim();
        if value.is_empty() {
            return Ok(0.0);
        }
        value
            .parse::<f64>()
            .map_err(|_| GridcalcError::NonNumericReference {
                cell: cell_ref.clone(),
                value: value.to_string(),
            })
    }

    /// Recompute every transitive dependent of `changed`, each one only after
    /// its own dependencies have settled.
    ///
    /// A dependent that fails keeps its previous value; the cascade goes on and
    /// the first failure is returned. A dependent that resolves to a sentinel
    /// stops the cascade below it: cells downstream of it keep their values.
    fn cascade(&mut self, changed: &CellRef) -> Result<()> {
        let order = self.graph.recalc_order(changed);
        if order.is_empty() {
            return Ok(());
        }
        debug!("{} changed, recomputing {} dependents", changed, order.len());

        let mut blocked: HashSet<CellRef> = HashSet::new();
        let mut first_error = None;
        for cell_ref in order {
            if self
                .graph
                .dependencies(&cell_ref)
                .any(|dependency| blocked.contains(dependency))
            {
                trace!("skipping {} behind a sentinel", cell_ref);
                blocked.insert(cell_ref);
                continue;
            }
            trace!("recomputing {}", cell_ref);
            match self.evaluate_cell(&cell_ref) {
                Ok(Outcome::Settled) => {}
                Ok(Outcome::Circular | Outcome::SelfReference) => {
                    blocked.insert(cell_ref);
                }
                Err(err) => {
                    warn!("recomputing {} failed: {}", cell_ref, err);
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use crate::error::GridcalcError;
    use gridcalc_engine::engine::{CIRCULAR_REF, CellRef, SELF_REF};

    fn at(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    fn set(doc: &mut Document, name: &str, text: &str) -> crate::Result<()> {
        let cell = at(name);
        doc.set_cell_text(cell.row as i64, cell.col as i64, text)
            .map(|_| ())
    }

    fn value(doc: &Document, name: &str) -> String {
        doc.cell_display(&at(name)).to_string()
    }

    #[test]
    fn test_plain_text_is_its_own_value() {
        let mut doc = Document::new();
        set(&mut doc, "A1", "hello").unwrap();
        assert_eq!(value(&doc, "A1"), "hello");
        assert!(doc.dependencies_of(&at("A1")).is_empty());
    }

    #[test]
    fn test_formula_follows_its_reference() {
        let mut doc = Document::new();
        set(&mut doc, "B1", "5").unwrap();
        set(&mut doc, "A1", "=B1*2").unwrap();
        assert_eq!(value(&doc, "A1"), "10");

        set(&mut doc, "B1", "10").unwrap();
        assert_eq!(value(&doc, "A1"), "20");
    }

    #[test]
    fn test_empty_reference_counts_as_zero() {
        let mut doc = Document::new();
        set(&mut doc, "A1", "=C3+4").unwrap();
        assert_eq!(value(&doc, "A1"), "4");
        assert_eq!(doc.dependencies_of(&at("A1")), vec![at("C3")]);
    }

    #[test]
    fn test_lowercase_references_resolve() {
        let mut doc = Document::new();
        set(&mut doc, "B2", "3").unwrap();
        set(&mut doc, "A1", "=b2*b2").unwrap();
        assert_eq!(value(&doc, "A1"), "9");
    }

    #[test]
    fn test_cascade_runs_in_dependency_order() {
        // D1 reads both B1 and C1, C1 reads B1: D1 must see the new C1.
        let mut doc = Document::new();
        set(&mut doc, "A1", "1").unwrap();
        set(&mut doc, "B1", "=A1+1").unwrap();
        set(&mut doc, "C1", "=B1*10").unwrap();
        set(&mut doc, "D1", "=C1+B1").unwrap();
        assert_eq!(value(&doc, "D1"), "22");

        set(&mut doc, "A1", "2").unwrap();
        assert_eq!(value(&doc, "B1"), "3");
        assert_eq!(value(&doc, "C1"), "30");
        assert_eq!(value(&doc, "D1"), "33");
    }

    #[test]
    fn test_recompute_twice_is_stable() {
        let mut doc = Document::new();
        set(&mut doc, "B1", "4").unwrap();
        set(&mut doc, "A1", "=B1+B1/2").unwrap();
        let first = (value(&doc, "A1"), doc.dependencies_of(&at("A1")));
        set(&mut doc, "A1", "=B1+B1/2").unwrap();
        let second = (value(&doc, "A1"), doc.dependencies_of(&at("A1")));
        assert_eq!(first, second);
        assert_eq!(doc.dependents_of(&at("B1")), vec![at("A1")]);
        assert_eq!(doc.graph.edge_count(), 1);
    }

    #[test]
    fn test_mutual_references_are_circular() {
        let mut doc = Document::new();
        set(&mut doc, "A1", "=B1").unwrap();
        set(&mut doc, "B1", "=A1").unwrap();
        assert_eq!(value(&doc, "B1"), CIRCULAR_REF);

        set(&mut doc, "A1", "=B1").unwrap();
        assert_eq!(value(&doc, "A1"), CIRCULAR_REF);
    }

    #[test]
    fn test_circular_edit_skips_dependents() {
        let mut doc = Document::new();
        set(&mut doc, "C1", "1").unwrap();
        set(&mut doc, "B1", "=C1").unwrap();
        set(&mut doc, "A1", "=B1+1").unwrap();
        assert_eq!(value(&doc, "A1"), "2");

        // C1 now needs A1, which needs B1, which needs C1.
        set(&mut doc, "C1", "=A1").unwrap();
        assert_eq!(value(&doc, "C1"), CIRCULAR_REF);
        assert_eq!(value(&doc, "B1"), "1");
        assert_eq!(value(&doc, "A1"), "2");
    }

    #[test]
    fn test_sentinel_in_cascade_stops_downstream() {
        let mut doc = Document::new();
        set(&mut doc, "X1", "1").unwrap();
        set(&mut doc, "A1", "=X1+B1").unwrap();
        set(&mut doc, "C1", "=A1").unwrap();
        set(&mut doc, "B1", "=A1").unwrap();
        assert_eq!(value(&doc, "B1"), CIRCULAR_REF);
        assert_eq!(value(&doc, "C1"), "1");

        // A1 turns circular during the cascade; C1 reads A1 and is left alone
        // instead of failing on the sentinel text.
        set(&mut doc, "X1", "2").unwrap();
        assert_eq!(value(&doc, "A1"), CIRCULAR_REF);
        assert_eq!(value(&doc, "B1"), CIRCULAR_REF);
        assert_eq!(value(&doc, "C1"), "1");
    }

    #[test]
    fn test_self_reference_is_distinct_from_cycle() {
        let mut doc = Document::new();
        set(&mut doc, "B1", "7").unwrap();
        set(&mut doc, "C1", "=A1").unwrap();
        set(&mut doc, "A1", "=A1+B1").unwrap();
        assert_eq!(value(&doc, "A1"), SELF_REF);
        // The cascade was skipped, C1 still shows the old A1.
        assert_eq!(value(&doc, "C1"), "0");
    }

    #[test]
    fn test_breaking_a_cycle_recovers() {
        let mut doc = Document::new();
        set(&mut doc, "A1", "=B1").unwrap();
        set(&mut doc, "B1", "=A1").unwrap();
        set(&mut doc, "B1", "6").unwrap();
        assert_eq!(value(&doc, "B1"), "6");
        assert_eq!(value(&doc, "A1"), "6");
    }

    #[test]
    fn test_unknown_reference_is_an_error() {
        let mut doc = Document::new();
        let err = set(&mut doc, "A1", "=Q99+1").unwrap_err();
        assert!(matches!(err, GridcalcError::UnknownReference { ref name } if name == "Q99"));

        let err = set(&mut doc, "A1", "=rate*2").unwrap_err();
        assert!(matches!(err, GridcalcError::UnknownReference { .. }));
    }

    #[test]
    fn test_failed_formula_keeps_value_and_drops_edges() {
        let mut doc = Document::new();
        set(&mut doc, "B1", "2").unwrap();
        set(&mut doc, "C1", "word").unwrap();
        set(&mut doc, "A1", "=B1*3").unwrap();
        set(&mut doc, "D1", "=A1+1").unwrap();
        assert_eq!(value(&doc, "D1"), "7");

        let err = set(&mut doc, "A1", "=C1*3").unwrap_err();
        assert!(matches!(err, GridcalcError::NonNumericReference { .. }));
        assert_eq!(value(&doc, "A1"), "6");
        assert!(doc.dependencies_of(&at("A1")).is_empty());
        assert_eq!(value(&doc, "D1"), "7");
        assert_eq!(doc.cell(&at("A1")).unwrap().text, "=C1*3");
    }

    #[test]
    fn test_parse_error_leaves_other_cells_alone() {
        let mut doc = Document::new();
        set(&mut doc, "B1", "1").unwrap();
        let err = set(&mut doc, "A1", "=(B1+2").unwrap_err();
        assert!(matches!(err, GridcalcError::Formula(_)));
        assert_eq!(value(&doc, "A1"), "");
        assert_eq!(value(&doc, "B1"), "1");

        let err = set(&mut doc, "A1", "=-B1").unwrap_err();
        assert!(matches!(err, GridcalcError::Formula(_)));
    }

    #[test]
    fn test_cascade_reports_failing_dependent() {
        let mut doc = Document::new();
        set(&mut doc, "B1", "1").unwrap();
        set(&mut doc, "A1", "=B1").unwrap();
        set(&mut doc, "C1", "=B1+1").unwrap();

        let err = set(&mut doc, "B1", "text").unwrap_err();
        assert!(matches!(err, GridcalcError::NonNumericReference { .. }));
        assert_eq!(value(&doc, "B1"), "text");
        assert_eq!(value(&doc, "A1"), "1");
        assert_eq!(value(&doc, "C1"), "2");

        set(&mut doc, "B1", "4").unwrap();
        assert_eq!(value(&doc, "A1"), "4");
        assert_eq!(value(&doc, "C1"), "5");
    }

    #[test]
    fn test_division_by_zero_propagates_as_number() {
        let mut doc = Document::new();
        set(&mut doc, "A1", "=1/B1").unwrap();
        assert_eq!(value(&doc, "A1"), "Infinity");
        set(&mut doc, "C1", "=A1*0").unwrap();
        assert_eq!(value(&doc, "C1"), "NaN");
    }

    #[test]
    fn test_negative_zero_displays_as_zero() {
        let mut doc = Document::new();
        set(&mut doc, "B1", "-5").unwrap();
        set(&mut doc, "A1", "=B1*0").unwrap();
        assert_eq!(value(&doc, "A1"), "0");
    }

    #[test]
    fn test_long_chain_cascades_without_recursion() {
        let mut doc = Document::with_config(crate::SheetConfig {
            rows: 2000,
            cols: 1,
            undo_limit: 10,
        })
        .unwrap();
        doc.set_cell_text(0, 0, "1").unwrap();
        for row in 1..2000 {
            doc.set_cell_text(row, 0, &format!("=A{}+1", row)).unwrap();
        }
        doc.set_cell_text(0, 0, "10").unwrap();
        assert_eq!(doc.get_cell(1999, 0).unwrap().value, "2009");
    }

    #[test]
    fn test_very_long_formula_evaluates() {
        let mut doc = Document::new();
        let formula = format!("={}1", "B1+".repeat(30_000));
        set(&mut doc, "A1", &formula).unwrap();
        assert_eq!(value(&doc, "A1"), "1");

        set(&mut doc, "B1", "2").unwrap();
        assert_eq!(value(&doc, "A1"), "60001");
    }
}
