use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::{HierarchyError, IntegrityViolation, Result};
use crate::record::{Record, RecordId};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    OnPath,
    Done,
}

/// Report every integrity problem of a flat record collection.
///
/// Duplicate ids and dangling parents come first, in input order, followed
/// by the members of parent cycles. The collection is never rejected here;
/// callers decide whether to render the reachable subset anyway.
pub fn validate<R: Record>(records: &[R]) -> Vec<IntegrityViolation> {
    let mut violations = Vec::new();
    let mut lookup: HashMap<RecordId, usize> = HashMap::new();
    let mut duplicate = vec![false; records.len()];

    for (position, record) in records.iter().enumerate() {
        match lookup.entry(record.id()) {
            Entry::Occupied(entry) => {
                duplicate[position] = true;
                violations.push(IntegrityViolation::DuplicateId {
                    id: record.id(),
                    first: *entry.get(),
                    duplicate: position,
                });
            },
            Entry::Vacant(entry) => {
                entry.insert(position);
            },
        }
    }

    for (position, record) in records.iter().enumerate() {
        if duplicate[position] {
            continue;
        }
        if let Some(parent_id) = record.parent_id() {
            if !lookup.contains_key(&parent_id) {
                violations.push(IntegrityViolation::DanglingParent {
                    id: record.id(),
                    parent_id,
                });
            }
        }
    }

    let mut cyclic = find_cycles(records, &lookup, &duplicate);
    cyclic.sort_unstable();
    violations.extend(cyclic.into_iter().map(|position| {
        IntegrityViolation::ParentCycle {
            id: records[position].id(),
        }
    }));

    violations
}

/// Fail with [`HierarchyError::Malformed`] when [`validate`] finds anything.
pub fn ensure_valid<R: Record>(records: &[R]) -> Result<()> {
    let violations = validate(records);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(HierarchyError::Malformed(violations))
    }
}

fn find_cycles<R: Record>(
    records: &[R],
    lookup: &HashMap<RecordId, usize>,
    skip: &[bool],
) -> Vec<usize> {
    let mut state = vec![Visit::Pending; records.len()];
    let mut members = Vec::new();
    let mut path: Vec<usize> = Vec::new();

    for start in 0..records.len() {
        if skip[start] || state[start] != Visit::Pending {
            continue;
        }

        let mut current = Some(start);
        while let Some(position) = current {
            match state[position] {
                Visit::Done => break,
                Visit::OnPath => {
                    if let Some(entry) =
                        path.iter().position(|step| *step == position)
                    {
                        members.extend_from_slice(&path[entry..]);
                    }
                    break;
                },
                Visit::Pending => {
                    state[position] = Visit::OnPath;
                    path.push(position);
                    current = records[position]
                        .parent_id()
                        .and_then(|parent| lookup.get(&parent).copied());
                },
            }
        }

        for step in path.drain(..) {
            state[step] = Visit::Done;
        }
    }

    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MenuRecord;

    fn record(id: RecordId, parent: Option<RecordId>) -> MenuRecord {
        MenuRecord::new(id, parent, 0)
    }

    #[test]
    fn validate_accepts_clean_hierarchy() {
        let records =
            vec![record(1, None), record(2, Some(1)), record(3, Some(2))];
        assert!(validate(&records).is_empty());
        assert!(ensure_valid(&records).is_ok());
    }

    #[test]
    fn validate_reports_duplicates_with_positions() {
        let records = vec![record(1, None), record(2, None), record(1, None)];
        assert_eq!(
            validate(&records),
            vec![IntegrityViolation::DuplicateId {
                id: 1,
                first: 0,
                duplicate: 2,
            }]
        );
    }

    #[test]
    fn validate_reports_dangling_parent() {
        let records = vec![record(1, None), record(4, Some(99))];
        assert_eq!(
            validate(&records),
            vec![IntegrityViolation::DanglingParent {
                id: 4,
                parent_id: 99,
            }]
        );
    }

    #[test]
    fn validate_reports_cycle_members_only() {
        let records = vec![
            record(1, None),
            record(2, Some(3)),
            record(3, Some(2)),
            record(5, Some(2)),
            record(6, Some(6)),
        ];

        let ids: Vec<RecordId> =
            validate(&records).iter().map(IntegrityViolation::id).collect();
        assert_eq!(ids, vec![2, 3, 6]);
        assert!(validate(&records).iter().all(|violation| matches!(
            violation,
            IntegrityViolation::ParentCycle { .. }
        )));
    }

    #[test]
    fn ensure_valid_wraps_violations() {
        let records = vec![record(4, Some(99))];
        match ensure_valid(&records) {
            Err(HierarchyError::Malformed(violations)) => {
                assert_eq!(violations.len(), 1);
            },
            other => panic!("expected malformed hierarchy, got {other:?}"),
        }
    }

    #[test]
    fn violation_messages_name_the_record() {
        let violation = IntegrityViolation::DanglingParent {
            id: 4,
            parent_id: 99,
        };
        assert_eq!(
            violation.to_string(),
            "record 4 references unknown parent 99"
        );
    }
}
