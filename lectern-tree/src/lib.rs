//! Flat-to-tree conversion and an expand/collapse row model for tables.
//!
//! This crate is split into three layers:
//! - records ([`Record`], [`MenuRecord`]) describing flat, parent-referencing
//!   rows as they arrive from the admin API;
//! - the tree builder ([`build_tree`]) producing an ordered [`Forest`], plus
//!   [`validate`] for callers that want integrity diagnostics;
//! - the view model ([`ExpandStates`], [`flatten`], [`TreeTable`]) turning a
//!   forest into the visible rows of a flat table widget.
//!
//! The recommended flow for interactive tables:
//! 1. build a [`TreeTable`] from the fetched records;
//! 2. render [`TreeTable::rows`], indenting by [`FlatRow::level`] and drawing
//!    a toggle icon unless the row is [`ExpandState::NonExpandable`];
//! 3. call [`TreeTable::toggle`] from the icon callback and render again;
//! 4. call [`TreeTable::replace`] after every data refresh.
//!
//! # Quick Example
//!
//! ```
//! use lectern_tree::{MenuRecord, TreeTable};
//!
//! let mut table = TreeTable::new(vec![
//!     MenuRecord::new(1, None, 0).with_field("title", "Courses"),
//!     MenuRecord::new(2, Some(1), 1).with_field("title", "Chapters"),
//!     MenuRecord::new(3, Some(1), 0).with_field("title", "Offerings"),
//! ]);
//!
//! table.toggle(1);
//! let rows: Vec<_> = table
//!     .rows()
//!     .iter()
//!     .map(|row| (row.id(), row.level))
//!     .collect();
//! assert_eq!(rows, vec![(1, 0), (3, 1), (2, 1)]);
//! ```

mod error;
mod expand;
mod flatten;
mod forest;
mod record;
mod table;
mod validate;

pub use error::{HierarchyError, IntegrityViolation, Result};
pub use expand::{ExpandState, ExpandStates};
pub use flatten::{FlatRow, flatten};
pub use forest::{Forest, NodeIndex, TreeNode, build_tree, build_tree_strict};
pub use record::{MenuRecord, Record, RecordId};
pub use table::TreeTable;
pub use validate::{ensure_valid, validate};
