use crate::error::IntegrityViolation;
use crate::expand::{ExpandState, ExpandStates};
use crate::flatten::{FlatRow, flatten};
use crate::forest::{Forest, build_tree};
use crate::record::{Record, RecordId};
use crate::validate::validate;

/// Presentation state for a hierarchical table.
///
/// Owns the forest built from the latest data refresh and the expand state
/// of its rows. Visible rows are recomputed from both on every call to
/// [`TreeTable::rows`].
#[derive(Debug, Clone)]
pub struct TreeTable<R> {
    forest: Forest<R>,
    states: ExpandStates,
    violations: Vec<IntegrityViolation>,
}

impl<R> Default for TreeTable<R> {
    fn default() -> Self {
        Self {
            forest: Forest::default(),
            states: ExpandStates::new(),
            violations: Vec::new(),
        }
    }
}

impl<R: Record> TreeTable<R> {
    pub fn new(records: Vec<R>) -> Self {
        let mut table = Self::default();
        table.replace(records);
        table
    }

    /// Rebuild the forest from fresh records and re-initialize row states.
    pub fn replace(&mut self, records: Vec<R>) {
        self.violations = validate(&records);
        self.forest = build_tree(records);
        self.states.rebuild(&self.forest);
    }

    /// Toggle one row and return its new state.
    pub fn toggle(&mut self, id: RecordId) -> ExpandState {
        self.states.toggle(id)
    }

    pub fn expand_all(&mut self) {
        self.states.expand_all(&self.forest);
    }

    pub fn collapse_all(&mut self) {
        self.states.collapse_all(&self.forest);
    }

    /// Make the row with `id` visible by expanding its ancestors.
    pub fn reveal(&mut self, id: RecordId) -> bool {
        self.states.expand_to(&self.forest, id)
    }

    /// Currently visible rows.
    pub fn rows(&self) -> Vec<FlatRow<'_, R>> {
        flatten(&self.forest, &self.states)
    }

    pub fn forest(&self) -> &Forest<R> {
        &self.forest
    }

    pub fn states(&self) -> &ExpandStates {
        &self.states
    }

    /// Integrity problems found in the records of the last refresh.
    pub fn violations(&self) -> &[IntegrityViolation] {
        &self.violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MenuRecord;

    fn records() -> Vec<MenuRecord> {
        vec![
            MenuRecord::new(1, None, 0),
            MenuRecord::new(2, Some(1), 0),
            MenuRecord::new(3, Some(2), 0),
        ]
    }

    fn visible(table: &TreeTable<MenuRecord>) -> Vec<RecordId> {
        table.rows().iter().map(FlatRow::id).collect()
    }

    #[test]
    fn toggling_reveals_and_hides_children() {
        let mut table = TreeTable::new(records());
        assert_eq!(visible(&table), vec![1]);

        assert_eq!(table.toggle(1), ExpandState::Expanded);
        assert_eq!(visible(&table), vec![1, 2]);

        table.toggle(2);
        assert_eq!(visible(&table), vec![1, 2, 3]);

        table.toggle(1);
        assert_eq!(visible(&table), vec![1]);
    }

    #[test]
    fn replace_resets_expand_state() {
        let mut table = TreeTable::new(records());
        table.expand_all();
        assert_eq!(visible(&table), vec![1, 2, 3]);

        table.replace(records());
        assert_eq!(visible(&table), vec![1]);
    }

    #[test]
    fn replace_keeps_toggles_of_unknown_rows() {
        let mut table = TreeTable::new(records());
        table.toggle(4);

        let mut refreshed = records();
        refreshed.push(MenuRecord::new(4, None, 1));
        refreshed.push(MenuRecord::new(5, Some(4), 0));
        table.replace(refreshed);

        assert_eq!(visible(&table), vec![1, 4, 5]);
    }

    #[test]
    fn reveal_expands_ancestors() {
        let mut table = TreeTable::new(records());
        assert!(table.reveal(3));
        assert_eq!(visible(&table), vec![1, 2, 3]);
    }

    #[test]
    fn replace_records_violations() {
        let mut records = records();
        records.push(MenuRecord::new(9, Some(99), 0));

        let table = TreeTable::new(records);
        assert_eq!(table.violations().len(), 1);
        assert_eq!(table.forest().len(), 3);
    }
}
