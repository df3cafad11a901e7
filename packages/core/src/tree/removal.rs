//! Removal Planning
//!
//! Deleting a document that has children needs an explicit policy. Both
//! policies keep the surviving sibling groups dense:
//!
//! - [`DeletePolicy::ReparentToGrandparent`] splices the children, in order,
//!   into the slot the deleted document occupied.
//! - [`DeletePolicy::CascadeSubtree`] deletes the whole subtree and closes
//!   the gap in the parent's group.

use crate::models::{Document, PositionUpdate};
use crate::tree::error::TreeError;
use crate::tree::grouping::{group_refs, GroupKey};
use crate::tree::validation::{index_by_id, renumber};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// What happens to the children of a deleted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Children take the deleted document's place under its parent
    #[default]
    ReparentToGrandparent,
    /// The document and all of its descendants are deleted
    CascadeSubtree,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reparent_to_grandparent" | "reparent" => Ok(DeletePolicy::ReparentToGrandparent),
            "cascade_subtree" | "cascade" => Ok(DeletePolicy::CascadeSubtree),
            other => Err(format!("unknown delete policy '{}'", other)),
        }
    }
}

/// Documents to delete plus the placement updates for the survivors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalPlan {
    pub deleted_ids: Vec<String>,
    pub updates: Vec<PositionUpdate>,
}

/// Plan the deletion of `document_id` from a project snapshot.
pub fn compute_removal(
    documents: &[Document],
    document_id: &str,
    policy: DeletePolicy,
) -> Result<RemovalPlan, TreeError> {
    let by_id = index_by_id(documents);
    let document = *by_id
        .get(document_id)
        .ok_or_else(|| TreeError::source_not_found(document_id))?;

    let (mut groups, _) = group_refs(documents);
    let key = GroupKey::of(document);
    let mut updates = Vec::new();

    let deleted_ids = match policy {
        DeletePolicy::ReparentToGrandparent => {
            let children: Vec<&Document> = groups
                .remove(&GroupKey::Parent(document.id.clone()))
                .unwrap_or_default()
                .into_iter()
                .filter(|d| d.id != document.id)
                .collect();

            let siblings = groups.entry(key.clone()).or_default();
            match siblings.iter().position(|d| d.id == document.id) {
                Some(slot) => {
                    siblings.splice(slot..=slot, children);
                }
                None => siblings.extend(children),
            }
            renumber(&key, siblings, &mut updates);

            vec![document.id.clone()]
        }
        DeletePolicy::CascadeSubtree => {
            let mut deleted: Vec<String> = vec![document.id.clone()];
            let mut seen: HashSet<&str> = HashSet::from([document.id.as_str()]);
            let mut cursor = 0;

            while cursor < deleted.len() {
                let parent = GroupKey::Parent(deleted[cursor].clone());
                cursor += 1;
                for child in groups.get(&parent).map(Vec::as_slice).unwrap_or(&[]) {
                    if seen.insert(child.id.as_str()) {
                        deleted.push(child.id.clone());
                    }
                }
            }

            if let Some(siblings) = groups.get_mut(&key) {
                siblings.retain(|d| !seen.contains(d.id.as_str()));
                renumber(&key, siblings, &mut updates);
            }

            deleted
        }
    };

    tracing::debug!(
        "Planned removal of '{}' ({:?}): {} deleted, {} update(s)",
        document_id,
        policy,
        deleted_ids.len(),
        updates.len()
    );

    Ok(RemovalPlan {
        deleted_ids,
        updates,
    })
}
