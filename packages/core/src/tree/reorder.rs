//! Reorder / Reparent Computation
//!
//! Turns a drag-and-drop intent into the complete set of placement updates
//! that keeps the project tree consistent.
//!
//! # Modes
//!
//! - **Reorder** (`reparent = false`): the source becomes a sibling of the
//!   target, inserted immediately before it, and adopts the target's parent.
//! - **Reparent** (`reparent = true`): the source becomes the last child of
//!   the target.
//!
//! # Guarantees
//!
//! Only the source's old sibling group and the destination group are
//! renumbered; every other group is untouched. An update is emitted only for
//! a document whose parent or position actually changes. A rejected move
//! returns an error and no updates at all.
//!
//! # Examples
//!
//! ```rust
//! use teamspace_core::models::Document;
//! use teamspace_core::tree::{compute_move, MoveRequest};
//!
//! let doc = |id: &str, pos| Document::new_with_id(id, "org", "p", id, id, "u").placed(None, pos);
//! let docs = vec![doc("p0", 0), doc("p1", 1), doc("p2", 2)];
//!
//! let outcome = compute_move(&docs, &MoveRequest::reorder("p2", "p0")).unwrap();
//! let moved: Vec<_> = outcome.updates().iter().map(|u| (u.id.as_str(), u.position)).collect();
//! assert_eq!(moved, vec![("p2", 0), ("p0", 1), ("p1", 2)]);
//! ```

use crate::models::{Document, PositionUpdate};
use crate::tree::error::TreeError;
use crate::tree::grouping::{group_refs, GroupKey};
use crate::tree::validation::{chain_contains, index_by_id, renumber};
use serde::{Deserialize, Serialize};

/// A drag-and-drop intent produced by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// The dragged document
    pub source_id: String,
    /// The document it was dropped on
    pub target_id: String,
    /// Modifier held during the drop: nest under the target instead of
    /// placing beside it
    #[serde(default)]
    pub reparent: bool,
}

impl MoveRequest {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, reparent: bool) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            reparent,
        }
    }

    /// Place `source_id` immediately before `target_id`, under the same parent
    pub fn reorder(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self::new(source_id, target_id, false)
    }

    /// Append `source_id` as the last child of `target_id`
    pub fn reparent(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self::new(source_id, target_id, true)
    }

    pub fn mode(&self) -> MoveMode {
        if self.reparent {
            MoveMode::Reparent
        } else {
            MoveMode::Reorder
        }
    }

    pub fn is_self_drop(&self) -> bool {
        self.source_id == self.target_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    Reorder,
    Reparent,
}

/// Result of a successful move computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing changes (self-drop, or the document is already in place)
    NoOp,
    /// Apply all of these updates as one unit
    Moved { updates: Vec<PositionUpdate> },
}

impl MoveOutcome {
    pub fn updates(&self) -> &[PositionUpdate] {
        match self {
            MoveOutcome::NoOp => &[],
            MoveOutcome::Moved { updates } => updates,
        }
    }

    pub fn into_updates(self) -> Vec<PositionUpdate> {
        match self {
            MoveOutcome::NoOp => Vec::new(),
            MoveOutcome::Moved { updates } => updates,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, MoveOutcome::NoOp)
    }
}

/// Compute the placement updates for a move.
///
/// `documents` must be the full snapshot of one project. The function is
/// pure; callers persist the returned updates atomically.
///
/// # Errors
///
/// - [`TreeError::SourceNotFound`] / [`TreeError::TargetNotFound`] if either
///   ID is missing from the snapshot
/// - [`TreeError::CycleRejected`] if the source would end up under one of its
///   own descendants
pub fn compute_move(documents: &[Document], request: &MoveRequest) -> Result<MoveOutcome, TreeError> {
    if request.is_self_drop() {
        return Ok(MoveOutcome::NoOp);
    }

    let by_id = index_by_id(documents);

    let source = *by_id
        .get(request.source_id.as_str())
        .ok_or_else(|| TreeError::source_not_found(&request.source_id))?;
    let target = *by_id
        .get(request.target_id.as_str())
        .ok_or_else(|| TreeError::target_not_found(&request.target_id))?;

    let new_parent: Option<&str> = match request.mode() {
        MoveMode::Reparent => Some(target.id.as_str()),
        MoveMode::Reorder => target.parent_id.as_deref(),
    };

    if let Some(parent_id) = new_parent {
        if chain_contains(&by_id, parent_id, &source.id) {
            tracing::warn!(
                "Rejected move of '{}' under '{}': would create a cycle",
                source.id,
                parent_id
            );
            return Err(TreeError::cycle_rejected(&source.id, parent_id));
        }
    }

    let (mut groups, _) = group_refs(documents);

    let old_key = GroupKey::of(source);
    let dest_key = GroupKey::from_parent(new_parent);

    if let Some(old_group) = groups.get_mut(&old_key) {
        old_group.retain(|d| d.id != source.id);
    }

    let dest_group = groups.entry(dest_key.clone()).or_default();
    let insert_at = match request.mode() {
        MoveMode::Reparent => dest_group.len(),
        MoveMode::Reorder => dest_group
            .iter()
            .position(|d| d.id == target.id)
            .unwrap_or(dest_group.len()),
    };
    dest_group.insert(insert_at, source);

    let mut updates = Vec::new();
    if old_key != dest_key {
        if let Some(old_group) = groups.get(&old_key) {
            renumber(&old_key, old_group, &mut updates);
        }
    }
    if let Some(dest_group) = groups.get(&dest_key) {
        renumber(&dest_key, dest_group, &mut updates);
    }

    if updates.is_empty() {
        tracing::debug!(
            "Move of '{}' onto '{}' leaves the tree unchanged",
            source.id,
            target.id
        );
        return Ok(MoveOutcome::NoOp);
    }

    tracing::debug!(
        "Computed {:?} of '{}' onto '{}': {} update(s)",
        request.mode(),
        source.id,
        target.id,
        updates.len()
    );

    Ok(MoveOutcome::Moved { updates })
}

/// Convenience wrapper taking the raw drag-and-drop parameters
pub fn compute_move_by_ids(
    documents: &[Document],
    source_id: &str,
    target_id: &str,
    reparent: bool,
) -> Result<MoveOutcome, TreeError> {
    compute_move(documents, &MoveRequest::new(source_id, target_id, reparent))
}
