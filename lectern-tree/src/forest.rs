use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;
use serde_json::Value;

use crate::error::{HierarchyError, Result};
use crate::record::{Record, RecordId};

/// Position of a node inside a [`Forest`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub const fn get(self) -> usize {
        self.0
    }
}

/// A record together with the ordered indices of its children.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<R> {
    record: R,
    children: Vec<NodeIndex>,
}

impl<R> TreeNode<R> {
    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn into_record(self) -> R {
        self.record
    }
}

impl<R: Record> TreeNode<R> {
    pub fn id(&self) -> RecordId {
        self.record.id()
    }
}

/// Ordered multi-root tree stored as an arena.
///
/// Nodes are stored in pre-order, so iterating the arena visits parents
/// before children and siblings in their sorted order. Only nodes that are
/// reachable from a root are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest<R> {
    nodes: Vec<TreeNode<R>>,
    roots: Vec<NodeIndex>,
    index: HashMap<RecordId, NodeIndex>,
}

impl<R> Default for Forest<R> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            index: HashMap::new(),
        }
    }
}

/// Arrange flat parent-referencing records into a [`Forest`].
///
/// Malformed input never fails the build:
/// - a record repeating an earlier id is discarded (first write wins);
/// - a record whose parent id is unknown is dropped together with its
///   descendants;
/// - records caught in a parent cycle are unreachable and dropped.
///
/// Every sibling sequence, the roots included, is stably sorted by
/// [`Record::order_num`].
pub fn build_tree<R, I>(records: I) -> Forest<R>
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    let mut slots: Vec<Option<R>> = Vec::new();
    let mut lookup: HashMap<RecordId, usize> = HashMap::new();

    for record in records {
        let id = record.id();
        match lookup.entry(id) {
            Entry::Occupied(_) => {
                log::warn!("duplicate record id {id}, keeping the first one");
            },
            Entry::Vacant(entry) => {
                entry.insert(slots.len());
                slots.push(Some(record));
            },
        }
    }

    let mut roots: Vec<usize> = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); slots.len()];
    for (position, slot) in slots.iter().enumerate() {
        let Some(record) = slot else {
            continue;
        };
        match record.parent_id() {
            None => roots.push(position),
            Some(parent_id) => match lookup.get(&parent_id) {
                Some(&parent) => children[parent].push(position),
                None => {
                    let id = record.id();
                    log::warn!(
                        "record {id} references unknown parent {parent_id}"
                    );
                },
            },
        }
    }

    let order_of = |position: &usize| {
        slots[*position].as_ref().map_or(0, Record::order_num)
    };
    roots.sort_by_key(order_of);
    for siblings in &mut children {
        siblings.sort_by_key(order_of);
    }

    let total = slots.len();
    let mut forest = Forest {
        nodes: Vec::with_capacity(total),
        roots: Vec::with_capacity(roots.len()),
        index: HashMap::with_capacity(total),
    };
    // Pre-order placement with an explicit stack; hierarchies can be deeper
    // than the thread stack allows for recursion.
    let mut stack: Vec<(usize, Option<NodeIndex>)> =
        roots.into_iter().rev().map(|root| (root, None)).collect();
    while let Some((position, parent)) = stack.pop() {
        let Some(record) = slots[position].take() else {
            continue;
        };
        let index = NodeIndex(forest.nodes.len());
        forest.index.insert(record.id(), index);
        forest.nodes.push(TreeNode {
            record,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => forest.nodes[parent.0].children.push(index),
            None => forest.roots.push(index),
        }

        let child_positions = std::mem::take(&mut children[position]);
        stack.extend(
            child_positions
                .into_iter()
                .rev()
                .map(|child| (child, Some(index))),
        );
    }

    let dropped = total - forest.len();
    if dropped > 0 {
        log::debug!("{dropped} of {total} records unreachable from a root");
    }

    forest
}

/// Like [`build_tree`], but refuses input that is not a clean hierarchy.
pub fn build_tree_strict<R: Record>(records: Vec<R>) -> Result<Forest<R>> {
    let violations = crate::validate::validate(&records);
    if !violations.is_empty() {
        return Err(HierarchyError::Malformed(violations));
    }
    Ok(build_tree(records))
}

impl<R> Forest<R> {
    /// Number of reachable nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root indices in display order.
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn node(&self, index: NodeIndex) -> &TreeNode<R> {
        &self.nodes[index.0]
    }

    /// Look a node up by record id.
    pub fn find(&self, id: RecordId) -> Option<&TreeNode<R>> {
        self.index_of(id).map(|index| self.node(index))
    }

    pub fn index_of(&self, id: RecordId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.index.contains_key(&id)
    }

    /// Children of `index` in sorted order.
    pub fn children(
        &self,
        index: NodeIndex,
    ) -> impl Iterator<Item = &TreeNode<R>> + '_ {
        self.node(index)
            .children
            .iter()
            .map(move |child| self.node(*child))
    }

    /// All nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode<R>> + '_ {
        self.nodes.iter()
    }

    /// Visit every node in pre-order together with its depth.
    pub fn walk(&self, mut visit: impl FnMut(&TreeNode<R>, usize)) {
        let mut stack: Vec<(NodeIndex, usize)> =
            self.roots.iter().rev().map(|root| (*root, 0)).collect();
        while let Some((index, depth)) = stack.pop() {
            let node = self.node(index);
            visit(node, depth);
            stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
        }
    }

    /// Map every record while keeping the shape of the forest.
    pub fn map_records<T>(self, mut map: impl FnMut(R) -> T) -> Forest<T> {
        Forest {
            nodes: self
                .nodes
                .into_iter()
                .map(|node| TreeNode {
                    record: map(node.record),
                    children: node.children,
                })
                .collect(),
            roots: self.roots,
            index: self.index,
        }
    }

    /// Consume the forest and return its records in pre-order.
    pub fn into_records(self) -> Vec<R> {
        self.nodes.into_iter().map(TreeNode::into_record).collect()
    }
}

impl<R: Record> Forest<R> {
    /// Keep only nodes accepted by `keep`.
    ///
    /// A rejected node is removed together with its whole subtree, even when
    /// some descendants would have been accepted.
    pub fn filter(self, mut keep: impl FnMut(&R) -> bool) -> Forest<R> {
        let mut accepted = vec![false; self.nodes.len()];
        let mut stack: Vec<NodeIndex> = self.roots.clone();
        while let Some(index) = stack.pop() {
            if keep(&self.nodes[index.0].record) {
                accepted[index.0] = true;
                stack.extend(self.nodes[index.0].children.iter().copied());
            }
        }

        let records = self
            .nodes
            .into_iter()
            .zip(accepted)
            .filter_map(|(node, accepted)| accepted.then_some(node.record));
        build_tree(records)
    }

    /// Depth of the node with the given id, roots being `0`.
    pub fn depth_of(&self, id: RecordId) -> Option<usize> {
        let mut current = self.find(id)?;
        let mut depth = 0;
        while let Some(parent) =
            current.record.parent_id().and_then(|p| self.find(p))
        {
            depth += 1;
            current = parent;
        }
        Some(depth)
    }

    /// Ids of the ancestors of `id`, nearest parent first.
    pub fn ancestors(&self, id: RecordId) -> Vec<RecordId> {
        let mut chain = Vec::new();
        let Some(mut current) = self.find(id) else {
            return chain;
        };
        while let Some(parent) =
            current.record.parent_id().and_then(|p| self.find(p))
        {
            chain.push(parent.id());
            current = parent;
        }
        chain
    }
}

impl<R: Serialize> Forest<R> {
    /// Nested JSON rendering: each record's fields plus a `children` array.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        // The arena is in pre-order, so walking it backwards finishes every
        // child before its parent.
        let mut built: Vec<Option<Value>> = vec![None; self.nodes.len()];
        for (position, node) in self.nodes.iter().enumerate().rev() {
            let mut value = serde_json::to_value(&node.record)?;
            let children = node
                .children
                .iter()
                .filter_map(|child| built[child.0].take())
                .collect();
            if let Value::Object(fields) = &mut value {
                fields.insert(String::from("children"), Value::Array(children));
            }
            built[position] = Some(value);
        }

        let roots = self
            .roots
            .iter()
            .filter_map(|root| built[root.0].take())
            .collect();
        Ok(Value::Array(roots))
    }
}
