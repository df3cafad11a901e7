//! Domain Events
//!
//! This module defines the events emitted after a document mutation has been
//! persisted. Read-side caches (the client's document list query, search
//! indexes) subscribe and invalidate the affected project; nothing in the
//! tree engine depends on them.
//!
//! # Event Flow
//!
//! 1. `DocumentService` applies a mutation through the `DocumentStore`
//! 2. Only after the store call succeeds, an event is sent on a tokio
//!    broadcast channel
//! 3. Subscribers invalidate whatever they cached for `project_id`

use crate::models::{Document, PositionUpdate};
use serde::Serialize;

/// Events emitted by `DocumentService`
///
/// Serialized with an internal `type` tag so the forwarding layer can hand
/// them to clients verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomainEvent {
    /// A new document was created
    #[serde(rename = "document:created")]
    DocumentCreated { document: Document },

    /// Title, content or flags changed (tree-neutral)
    #[serde(rename = "document:updated")]
    DocumentUpdated { document: Document },

    /// Documents were removed; `updates` re-placed the survivors
    #[serde(rename = "documents:deleted", rename_all = "camelCase")]
    DocumentsDeleted {
        project_id: String,
        ids: Vec<String>,
        updates: Vec<PositionUpdate>,
    },

    /// A move changed parents and/or positions
    #[serde(rename = "tree:reordered", rename_all = "camelCase")]
    TreeReordered {
        project_id: String,
        updates: Vec<PositionUpdate>,
    },
}

impl DomainEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            DomainEvent::DocumentCreated { .. } => "document:created",
            DomainEvent::DocumentUpdated { .. } => "document:updated",
            DomainEvent::DocumentsDeleted { .. } => "documents:deleted",
            DomainEvent::TreeReordered { .. } => "tree:reordered",
        }
    }

    /// The project whose cached document list is now stale
    pub fn project_id(&self) -> &str {
        match self {
            DomainEvent::DocumentCreated { document } | DomainEvent::DocumentUpdated { document } => {
                &document.project_id
            }
            DomainEvent::DocumentsDeleted { project_id, .. }
            | DomainEvent::TreeReordered { project_id, .. } => project_id,
        }
    }
}
