use crate::expand::{ExpandState, ExpandStates};
use crate::forest::{Forest, NodeIndex, TreeNode};
use crate::record::{Record, RecordId};

/// One visible row of a flattened forest.
#[derive(Debug)]
pub struct FlatRow<'a, R> {
    /// Zero-based depth (`0` for root rows).
    pub level: usize,
    /// Borrowed source node.
    pub node: &'a TreeNode<R>,
    /// Arena position of the node.
    pub index: NodeIndex,
    /// Resolved expand state, used for the toggle icon.
    pub state: ExpandState,
}

impl<R> FlatRow<'_, R> {
    pub fn record(&self) -> &R {
        self.node.record()
    }
}

impl<R: Record> FlatRow<'_, R> {
    pub fn id(&self) -> RecordId {
        self.node.id()
    }
}

/// Flatten a forest into a depth-first list of visible rows.
///
/// Roots are always emitted. Children are emitted only below rows whose
/// state is [`ExpandState::Expanded`]; ids missing from `states` count as
/// collapsed. Siblings keep the order of the forest.
pub fn flatten<'a, R: Record>(
    forest: &'a Forest<R>,
    states: &ExpandStates,
) -> Vec<FlatRow<'a, R>> {
    let mut rows = Vec::new();
    let mut stack: Vec<(NodeIndex, usize)> =
        forest.roots().iter().rev().map(|root| (*root, 0)).collect();
    while let Some((index, level)) = stack.pop() {
        let node = forest.node(index);
        let state = resolve_state(node, states);
        rows.push(FlatRow {
            level,
            node,
            index,
            state,
        });

        if state.is_expanded() {
            stack.extend(
                node.children().iter().rev().map(|child| (*child, level + 1)),
            );
        }
    }
    rows
}

// A leaf is reported as non-expandable whatever was recorded for it, so the
// renderer never offers a toggle that would reveal nothing.
fn resolve_state<R: Record>(
    node: &TreeNode<R>,
    states: &ExpandStates,
) -> ExpandState {
    if node.has_children() {
        states.get(node.id())
    } else {
        ExpandState::NonExpandable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::build_tree;
    use crate::record::MenuRecord;

    fn sample() -> Forest<MenuRecord> {
        build_tree(vec![
            MenuRecord::new(1, None, 0),
            MenuRecord::new(2, Some(1), 1),
            MenuRecord::new(3, Some(1), 0),
            MenuRecord::new(4, Some(3), 0),
            MenuRecord::new(5, None, 1),
        ])
    }

    fn rows_of(rows: &[FlatRow<'_, MenuRecord>]) -> Vec<(RecordId, usize)> {
        rows.iter().map(|row| (row.id(), row.level)).collect()
    }

    #[test]
    fn flatten_handles_empty_forest() {
        let forest: Forest<MenuRecord> = Forest::default();
        assert!(flatten(&forest, &ExpandStates::new()).is_empty());
    }

    #[test]
    fn flatten_shows_only_roots_when_collapsed() {
        let forest = sample();
        let states = ExpandStates::from_forest(&forest);

        let rows = flatten(&forest, &states);
        assert_eq!(rows_of(&rows), vec![(1, 0), (5, 0)]);
        assert_eq!(rows[0].state, ExpandState::Collapsed);
        assert_eq!(rows[1].state, ExpandState::NonExpandable);
    }

    #[test]
    fn flatten_respects_expansion_and_level() {
        let forest = sample();
        let mut states = ExpandStates::from_forest(&forest);
        states.toggle(1);

        let rows = flatten(&forest, &states);
        assert_eq!(rows_of(&rows), vec![(1, 0), (3, 1), (2, 1), (5, 0)]);
        assert_eq!(rows[1].state, ExpandState::Collapsed);
    }

    #[test]
    fn flatten_hides_grandchildren_of_collapsed_children() {
        let forest = sample();
        let mut states = ExpandStates::from_forest(&forest);
        states.toggle(3);

        let rows = flatten(&forest, &states);
        assert_eq!(rows_of(&rows), vec![(1, 0), (5, 0)]);
    }

    #[test]
    fn flatten_fully_expanded_emits_every_node_in_pre_order() {
        let forest = sample();
        let mut states = ExpandStates::from_forest(&forest);
        states.expand_all(&forest);

        let rows = flatten(&forest, &states);
        assert_eq!(
            rows_of(&rows),
            vec![(1, 0), (3, 1), (4, 2), (2, 1), (5, 0)]
        );
        assert_eq!(rows.len(), forest.len());
    }

    #[test]
    fn flatten_defaults_missing_states_to_collapsed() {
        let forest = sample();
        let rows = flatten(&forest, &ExpandStates::new());
        assert_eq!(rows_of(&rows), vec![(1, 0), (5, 0)]);
    }

    #[test]
    fn flatten_reports_leaves_as_non_expandable() {
        let forest = sample();
        let mut states = ExpandStates::new();
        states.set(5, ExpandState::Expanded);

        let rows = flatten(&forest, &states);
        assert_eq!(rows[1].state, ExpandState::NonExpandable);
    }

    #[test]
    fn flatten_level_matches_ancestor_count() {
        let forest = sample();
        let mut states = ExpandStates::from_forest(&forest);
        states.expand_all(&forest);

        let rows = flatten(&forest, &states);
        for row in &rows {
            assert_eq!(forest.ancestors(row.id()).len(), row.level);
        }
        assert_eq!(forest.ancestors(rows[2].id()), vec![3, 1]);
    }

    #[test]
    fn flatten_handles_very_deep_chains() {
        let records: Vec<MenuRecord> = (0..10_000)
            .map(|id| MenuRecord::new(id, (id > 0).then(|| id - 1), 0))
            .collect();
        let forest = build_tree(records);
        let mut states = ExpandStates::from_forest(&forest);
        states.expand_all(&forest);

        let rows = flatten(&forest, &states);
        assert_eq!(rows.len(), 10_000);
        assert_eq!(rows[9_999].level, 9_999);
        assert_eq!(rows[9_999].state, ExpandState::NonExpandable);
        assert_eq!(rows[0].state, ExpandState::Expanded);
    }
}
