use std::collections::{HashMap, HashSet};

use crate::forest::Forest;
use crate::record::{Record, RecordId};

/// Per-row expand/collapse flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpandState {
    Expanded,
    Collapsed,
    /// Leaf rows; they never get a toggle affordance.
    NonExpandable,
}

impl ExpandState {
    pub fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }

    /// State a freshly built node starts in.
    pub fn initial(has_children: bool) -> Self {
        if has_children {
            Self::Collapsed
        } else {
            Self::NonExpandable
        }
    }
}

/// Expand state of every row, keyed by record id.
///
/// Lookups for ids that were never recorded resolve to
/// [`ExpandState::Collapsed`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandStates {
    states: HashMap<RecordId, ExpandState>,
    pending: HashSet<RecordId>,
}

impl ExpandStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Branches start collapsed, leaves non-expandable.
    pub fn from_forest<R: Record>(forest: &Forest<R>) -> Self {
        let states = forest
            .iter()
            .map(|node| (node.id(), ExpandState::initial(node.has_children())))
            .collect();
        Self {
            states,
            pending: HashSet::new(),
        }
    }

    /// Re-initialize for a freshly built forest.
    ///
    /// Every state is reset as in [`ExpandStates::from_forest`], except that
    /// toggles recorded for ids that were unknown at the time are applied to
    /// branches that now carry those ids. Pending toggles that still match
    /// nothing are kept for the next rebuild.
    pub fn rebuild<R: Record>(&mut self, forest: &Forest<R>) {
        let mut next = Self::from_forest(forest);
        for id in self.pending.drain() {
            let recorded = self
                .states
                .get(&id)
                .copied()
                .unwrap_or(ExpandState::Collapsed);
            match next.states.get_mut(&id) {
                Some(state) => {
                    if *state == ExpandState::Collapsed {
                        *state = recorded;
                    }
                },
                None => {
                    next.states.insert(id, recorded);
                    next.pending.insert(id);
                },
            }
        }
        *self = next;
    }

    /// Resolved state for `id`.
    pub fn get(&self, id: RecordId) -> ExpandState {
        self.states
            .get(&id)
            .copied()
            .unwrap_or(ExpandState::Collapsed)
    }

    pub fn set(&mut self, id: RecordId, state: ExpandState) {
        self.states.insert(id, state);
    }

    /// Flip `Expanded` and `Collapsed`; `NonExpandable` stays as is.
    ///
    /// Unknown ids are recorded as pending and take effect once a matching
    /// node shows up in a later [`ExpandStates::rebuild`].
    pub fn toggle(&mut self, id: RecordId) -> ExpandState {
        let known = self.states.contains_key(&id);
        let next = match self.get(id) {
            ExpandState::Expanded => ExpandState::Collapsed,
            ExpandState::Collapsed => ExpandState::Expanded,
            ExpandState::NonExpandable => {
                log::debug!("ignoring toggle of non-expandable row {id}");
                return ExpandState::NonExpandable;
            },
        };

        if !known || self.pending.contains(&id) {
            log::debug!("recording toggle of unknown row {id}");
            self.pending.insert(id);
        }
        self.states.insert(id, next);
        next
    }

    /// Expand every branch of the forest.
    pub fn expand_all<R: Record>(&mut self, forest: &Forest<R>) {
        for node in forest.iter().filter(|node| node.has_children()) {
            self.states.insert(node.id(), ExpandState::Expanded);
        }
    }

    /// Collapse every branch of the forest.
    pub fn collapse_all<R: Record>(&mut self, forest: &Forest<R>) {
        for node in forest.iter().filter(|node| node.has_children()) {
            self.states.insert(node.id(), ExpandState::Collapsed);
        }
    }

    /// Expand every ancestor of `id` so that its row becomes visible.
    ///
    /// Returns `false` when the forest has no node with that id.
    pub fn expand_to<R: Record>(
        &mut self,
        forest: &Forest<R>,
        id: RecordId,
    ) -> bool {
        if !forest.contains(id) {
            return false;
        }
        for ancestor in forest.ancestors(id) {
            self.states.insert(ancestor, ExpandState::Expanded);
        }
        true
    }

    /// Ids currently expanded, ascending.
    pub fn expanded_ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self
            .states
            .iter()
            .filter(|(_, state)| state.is_expanded())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Whether a toggle for `id` is waiting for a matching node.
    pub fn is_pending(&self, id: RecordId) -> bool {
        self.pending.contains(&id)
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
            MenuRecord::new(2, Some(1), 0),
            MenuRecord::new(3, Some(2), 0),
            MenuRecord::new(4, None, 1),
        ])
    }

    #[test]
    fn from_forest_marks_leaves_non_expandable() {
        let states = ExpandStates::from_forest(&sample());

        assert_eq!(states.get(1), ExpandState::Collapsed);
        assert_eq!(states.get(2), ExpandState::Collapsed);
        assert_eq!(states.get(3), ExpandState::NonExpandable);
        assert_eq!(states.get(4), ExpandState::NonExpandable);
    }

    #[test]
    fn get_defaults_to_collapsed() {
        let states = ExpandStates::new();
        assert_eq!(states.get(42), ExpandState::Collapsed);
    }

    #[test]
    fn toggle_flips_branches_only() {
        let mut states = ExpandStates::from_forest(&sample());

        assert_eq!(states.toggle(1), ExpandState::Expanded);
        assert_eq!(states.toggle(1), ExpandState::Collapsed);
        assert_eq!(states.toggle(3), ExpandState::NonExpandable);
        assert_eq!(states.get(3), ExpandState::NonExpandable);
        assert!(!states.is_pending(1));
    }

    #[test]
    fn toggle_of_unknown_id_is_recorded_as_pending() {
        let mut states = ExpandStates::from_forest(&sample());

        assert_eq!(states.toggle(10), ExpandState::Expanded);
        assert!(states.is_pending(10));
        assert_eq!(states.get(10), ExpandState::Expanded);
    }

    #[test]
    fn rebuild_resets_known_rows() {
        let forest = sample();
        let mut states = ExpandStates::from_forest(&forest);
        states.toggle(1);

        states.rebuild(&forest);
        assert_eq!(states.get(1), ExpandState::Collapsed);
    }

    #[test]
    fn rebuild_applies_pending_toggles_to_new_branches() {
        let mut states = ExpandStates::from_forest(&sample());
        states.toggle(10);
        states.toggle(11);

        let refreshed = build_tree(vec![
            MenuRecord::new(10, None, 0),
            MenuRecord::new(12, Some(10), 0),
            MenuRecord::new(13, None, 1),
        ]);
        states.rebuild(&refreshed);

        assert_eq!(states.get(10), ExpandState::Expanded);
        assert!(!states.is_pending(10));
        assert_eq!(states.get(12), ExpandState::NonExpandable);
        assert!(states.is_pending(11));
    }

    #[test]
    fn rebuild_never_expands_new_leaves() {
        let mut states = ExpandStates::new();
        states.toggle(10);

        let refreshed = build_tree(vec![MenuRecord::new(10, None, 0)]);
        states.rebuild(&refreshed);

        assert_eq!(states.get(10), ExpandState::NonExpandable);
    }

    #[test]
    fn expand_all_and_collapse_all_skip_leaves() {
        let forest = sample();
        let mut states = ExpandStates::from_forest(&forest);

        states.expand_all(&forest);
        assert_eq!(states.expanded_ids(), vec![1, 2]);
        assert_eq!(states.get(3), ExpandState::NonExpandable);

        states.collapse_all(&forest);
        assert!(states.expanded_ids().is_empty());
    }

    #[test]
    fn expand_to_opens_ancestors() {
        let forest = sample();
        let mut states = ExpandStates::from_forest(&forest);

        assert!(states.expand_to(&forest, 3));
        assert_eq!(states.expanded_ids(), vec![1, 2]);
        assert!(!states.expand_to(&forest, 99));
    }
}
