use thiserror::Error;

use crate::record::RecordId;

/// One integrity problem found in a flat record collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
    #[error(
        "record id {id} at position {duplicate} repeats position {first}"
    )]
    DuplicateId {
        id: RecordId,
        first: usize,
        duplicate: usize,
    },

    #[error("record {id} references unknown parent {parent_id}")]
    DanglingParent { id: RecordId, parent_id: RecordId },

    #[error("record {id} is part of a parent cycle")]
    ParentCycle { id: RecordId },
}

impl IntegrityViolation {
    /// Id of the record the violation is reported against.
    pub fn id(&self) -> RecordId {
        match self {
            Self::DuplicateId { id, .. }
            | Self::DanglingParent { id, .. }
            | Self::ParentCycle { id } => *id,
        }
    }
}

/// Errors returned by the strict hierarchy entry points.
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("malformed hierarchy: {} violation(s)", .0.len())]
    Malformed(Vec<IntegrityViolation>),
}

pub type Result<T> = std::result::Result<T, HierarchyError>;
