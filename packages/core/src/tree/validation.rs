//! Structural Invariant Checks
//!
//! A project's documents must satisfy, after every committed mutation:
//!
//! 1. **Acyclicity** - following `parent_id` always ends at a root
//! 2. **Same-project containment** - a parent belongs to the child's project
//! 3. **Dense local ordering** - each sibling group holds positions `0..n-1`
//! 4. **Referential validity** - `parent_id` names an existing document
//!
//! This module checks those invariants over a snapshot and provides the
//! bounded ancestor walk used by the move cycle guard.

use crate::models::{Document, PositionUpdate};
use crate::tree::grouping::{group_refs, GroupKey};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// One broken invariant found in a snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Duplicate document id: {id}")]
    DuplicateId { id: String },

    #[error("Document {id} is its own ancestor")]
    Cycle { id: String },

    #[error("Document {id} has parent {parent_id} from another project")]
    CrossProject { id: String, parent_id: String },

    #[error("Document {id} references missing parent {parent_id}")]
    DanglingParent { id: String, parent_id: String },

    #[error("Sibling group {group:?} has non-dense positions {positions:?}")]
    NonDenseGroup {
        group: Option<String>,
        positions: Vec<u32>,
    },
}

/// Index documents by ID. The first occurrence wins on duplicate IDs.
pub(crate) fn index_by_id(documents: &[Document]) -> HashMap<&str, &Document> {
    let mut by_id = HashMap::with_capacity(documents.len());
    for document in documents {
        by_id.entry(document.id.as_str()).or_insert(document);
    }
    by_id
}

/// Whether `needle` appears on the ancestor chain starting at `start`
/// (inclusive of `start` itself).
///
/// The walk is bounded by the number of indexed documents, so an already
/// corrupt (cyclic) chain terminates instead of looping.
pub fn chain_contains(by_id: &HashMap<&str, &Document>, start: &str, needle: &str) -> bool {
    let mut current = Some(start);
    let mut steps = 0usize;

    while let Some(id) = current {
        if id == needle {
            return true;
        }
        if steps > by_id.len() {
            tracing::warn!("Ancestor walk from '{}' exceeded tree size, chain is cyclic", start);
            return false;
        }
        steps += 1;
        current = by_id.get(id).and_then(|d| d.parent_id.as_deref());
    }

    false
}

/// Whether `ancestor_id` is a strict ancestor of `document_id`
pub fn is_ancestor(documents: &[Document], ancestor_id: &str, document_id: &str) -> bool {
    let by_id = index_by_id(documents);
    by_id
        .get(document_id)
        .and_then(|d| d.parent_id.as_deref())
        .is_some_and(|parent| chain_contains(&by_id, parent, ancestor_id))
}

/// Check invariants 1-4 over a project snapshot.
///
/// Returns every violation found, not just the first.
pub fn validate_tree(documents: &[Document]) -> Result<(), Vec<InvariantViolation>> {
    let mut violations = Vec::new();

    let mut seen = HashSet::new();
    for document in documents {
        if !seen.insert(document.id.as_str()) {
            violations.push(InvariantViolation::DuplicateId {
                id: document.id.clone(),
            });
        }
    }

    let by_id = index_by_id(documents);

    for document in documents {
        let Some(parent_id) = document.parent_id.as_deref() else {
            continue;
        };

        match by_id.get(parent_id) {
            None => violations.push(InvariantViolation::DanglingParent {
                id: document.id.clone(),
                parent_id: parent_id.to_string(),
            }),
            Some(parent) if parent.project_id != document.project_id => {
                violations.push(InvariantViolation::CrossProject {
                    id: document.id.clone(),
                    parent_id: parent_id.to_string(),
                })
            }
            Some(_) => {}
        }

        if chain_contains(&by_id, parent_id, &document.id) {
            violations.push(InvariantViolation::Cycle {
                id: document.id.clone(),
            });
        }
    }

    let (groups, order) = group_refs(documents);
    for key in &order {
        let Some(members) = groups.get(key) else {
            continue;
        };
        let dense = members
            .iter()
            .enumerate()
            .all(|(index, d)| d.position as usize == index);
        if !dense {
            violations.push(InvariantViolation::NonDenseGroup {
                group: key.parent_id().map(str::to_string),
                positions: members.iter().map(|d| d.position).collect(),
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Materialize a batch of placement updates against a snapshot.
///
/// Updates naming unknown IDs are ignored; membership checks are the
/// persistence layer's job.
pub fn apply_updates(documents: &[Document], updates: &[PositionUpdate]) -> Vec<Document> {
    let mut documents = documents.to_vec();
    apply_updates_in_place(&mut documents, updates, |_| {});
    documents
}

/// Apply placement updates to `documents` directly, calling `touched` on
/// every document an update names (after its placement changed).
pub fn apply_updates_in_place(
    documents: &mut [Document],
    updates: &[PositionUpdate],
    mut touched: impl FnMut(&mut Document),
) {
    let by_id: HashMap<&str, &PositionUpdate> =
        updates.iter().map(|u| (u.id.as_str(), u)).collect();

    for document in documents.iter_mut() {
        if let Some(update) = by_id.get(document.id.as_str()) {
            document.parent_id = update.parent_id.clone();
            document.position = update.position;
            touched(document);
        }
    }
}

/// Renumber a sibling group as `0..n-1` under `key`, returning updates only
/// for members whose parent or position changes.
pub(crate) fn renumber(key: &GroupKey, members: &[&Document], updates: &mut Vec<PositionUpdate>) {
    let parent_id = key.parent_id();
    for (index, document) in members.iter().enumerate() {
        let position = index as u32;
        if document.position != position || document.parent_id.as_deref() != parent_id {
            updates.push(PositionUpdate::new(
                document.id.clone(),
                position,
                parent_id.map(str::to_string),
            ));
        }
    }
}
