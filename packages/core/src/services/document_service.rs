//! Document Service - Tree Mutations over a DocumentStore
//!
//! This module wires the pure tree engine to persistence:
//!
//! - Reads (project listing, grouped tree, nested tree, lookup by id or slug)
//! - Creation with unique slugs, appended to the root level
//! - Tree-neutral edits (title, content, flags)
//! - Moves (reorder / reparent) and deletions under a [`DeletePolicy`]
//!
//! # Mutation Protocol
//!
//! Every tree-affecting mutation runs the same steps while holding the
//! project's lock:
//!
//! 1. read the full project snapshot
//! 2. compute updates with the tree engine (no I/O)
//! 3. hand the whole batch to the store in one call
//! 4. emit a [`DomainEvent`] once the store call has succeeded
//!
//! A rejected computation never reaches step 3.
//!
//! [`DeletePolicy`]: crate::tree::DeletePolicy

use crate::config::TreeConfig;
use crate::db::{DocumentStore, DomainEvent, StoreError};
use crate::models::{Document, DocumentPatch, NewDocument};
use crate::services::error::DocumentServiceError;
use crate::services::project_locks::ProjectLocks;
use crate::tree::{
    build_tree, compute_move, compute_removal, next_root_position, validate_tree,
    DocumentTreeNode, GroupedTree, InvariantViolation, MoveOutcome, MoveRequest, RemovalPlan,
    TreeError,
};
use crate::utils::{SlugAllocator, SlugError, SlugLookup};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Adapts the store's slug check to the allocator's lookup seam
struct StoreSlugLookup<'a> {
    store: &'a dyn DocumentStore,
}

#[async_trait]
impl SlugLookup for StoreSlugLookup<'_> {
    async fn slug_exists(&self, project_id: &str, slug: &str) -> Result<bool, SlugError> {
        self.store
            .slug_exists(project_id, slug)
            .await
            .map_err(|e| SlugError::LookupFailed(e.to_string()))
    }
}

#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    config: TreeConfig,
    slugs: SlugAllocator,
    locks: ProjectLocks,
    event_tx: broadcast::Sender<DomainEvent>,
}

impl DocumentService {
    /// Create a service with default configuration
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use teamspace_core::db::InMemoryDocumentStore;
    /// # use teamspace_core::services::DocumentService;
    /// # use std::sync::Arc;
    /// let service = DocumentService::new(Arc::new(InMemoryDocumentStore::new()));
    /// ```
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(store, TreeConfig::default())
    }

    pub fn with_config(store: Arc<dyn DocumentStore>, config: TreeConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity.max(1));

        Self {
            store,
            slugs: SlugAllocator::new(config.max_slug_attempts),
            config,
            locks: ProjectLocks::new(),
            event_tx,
        }
    }

    /// Get access to the underlying store
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Subscribe to domain events
    ///
    /// Events are sent only after the store accepted the change.
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<DomainEvent> {
        self.event_tx.subscribe()
    }

    /// Ignores errors if no subscribers (expected in some tests).
    fn emit_event(&self, event: DomainEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Full, unordered snapshot of a project
    pub async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, DocumentServiceError> {
        Ok(self.store.list_documents(project_id).await?)
    }

    /// Project documents grouped by parent, in display order
    pub async fn document_tree(&self, project_id: &str) -> Result<GroupedTree, DocumentServiceError> {
        let documents = self.store.list_documents(project_id).await?;
        Ok(build_tree(&documents))
    }

    /// Nested view of a project, for sidebar-style rendering
    pub async fn nested_tree(
        &self,
        project_id: &str,
    ) -> Result<Vec<DocumentTreeNode>, DocumentServiceError> {
        Ok(self.document_tree(project_id).await?.to_nested())
    }

    /// Resolve a document by ID or slug
    pub async fn get_document(
        &self,
        project_id: &str,
        id_or_slug: &str,
    ) -> Result<Document, DocumentServiceError> {
        self.store
            .find_by_id_or_slug(project_id, id_or_slug)
            .await?
            .ok_or_else(|| DocumentServiceError::document_not_found(id_or_slug))
    }

    /// Report every broken invariant in a project (empty when healthy)
    pub async fn check_tree(
        &self,
        project_id: &str,
    ) -> Result<Vec<InvariantViolation>, DocumentServiceError> {
        let documents = self.store.list_documents(project_id).await?;
        Ok(validate_tree(&documents).err().unwrap_or_default())
    }

    /// Create a document at the end of the project's root level.
    ///
    /// The slug is derived from the title and made unique within the project.
    /// Slug checking and the insert happen under the project lock.
    pub async fn create_document(&self, params: NewDocument) -> Result<Document, DocumentServiceError> {
        params.validate()?;

        let _guard = self.locks.lock(&params.project_id).await;

        let snapshot = self.store.list_documents(&params.project_id).await?;
        let lookup = StoreSlugLookup {
            store: self.store.as_ref(),
        };
        let slug = self
            .slugs
            .allocate(&params.project_id, &params.title, &lookup)
            .await?;

        let mut document = Document::new(
            params.organization_id,
            params.project_id,
            params.title,
            slug,
            params.created_by,
        );
        document.content = params.content;
        document.kind = params.kind;
        document.position = next_root_position(&snapshot);
        document.validate()?;

        let created = self.store.insert_document(document).await?;

        tracing::info!(
            "Created document '{}' (slug '{}') in project '{}' at root position {}",
            created.id,
            created.slug,
            created.project_id,
            created.position
        );
        self.emit_event(DomainEvent::DocumentCreated {
            document: created.clone(),
        });

        Ok(created)
    }

    /// Edit title, content or flags. Never touches tree placement.
    pub async fn update_document(
        &self,
        project_id: &str,
        id: &str,
        patch: &DocumentPatch,
        edited_by: Option<&str>,
    ) -> Result<Document, DocumentServiceError> {
        patch.validate()?;

        let updated = self
            .store
            .patch_document(project_id, id, patch, edited_by)
            .await
            .map_err(|e| match e {
                StoreError::DocumentNotFound { id } => DocumentServiceError::DocumentNotFound { id },
                other => other.into(),
            })?;

        self.emit_event(DomainEvent::DocumentUpdated {
            document: updated.clone(),
        });

        Ok(updated)
    }

    /// Reorder or reparent a document and persist the resulting batch.
    ///
    /// Returns the computed outcome. A no-op never reaches the store.
    pub async fn move_document(
        &self,
        project_id: &str,
        request: &MoveRequest,
    ) -> Result<MoveOutcome, DocumentServiceError> {
        let _guard = self.locks.lock(project_id).await;

        let snapshot = self.store.list_documents(project_id).await?;
        let outcome = compute_move(&snapshot, request).map_err(|e| {
            tracing::warn!("Move rejected in project '{}': {}", project_id, e);
            e
        })?;

        let MoveOutcome::Moved { updates } = &outcome else {
            return Ok(outcome);
        };

        self.store.apply_position_updates(project_id, updates).await?;

        tracing::info!(
            "Moved document '{}' onto '{}' ({:?}) in project '{}': {} update(s)",
            request.source_id,
            request.target_id,
            request.mode(),
            project_id,
            updates.len()
        );
        self.emit_event(DomainEvent::TreeReordered {
            project_id: project_id.to_string(),
            updates: updates.clone(),
        });

        Ok(outcome)
    }

    /// Delete a document, handling its children per the configured policy.
    pub async fn delete_document(
        &self,
        project_id: &str,
        id: &str,
    ) -> Result<RemovalPlan, DocumentServiceError> {
        let _guard = self.locks.lock(project_id).await;

        let snapshot = self.store.list_documents(project_id).await?;
        let plan = compute_removal(&snapshot, id, self.config.delete_policy).map_err(|e| match e {
            TreeError::SourceNotFound { id } => DocumentServiceError::DocumentNotFound { id },
            other => other.into(),
        })?;

        self.store.apply_removal(project_id, &plan).await?;

        tracing::info!(
            "Deleted {} document(s) rooted at '{}' in project '{}' ({:?})",
            plan.deleted_ids.len(),
            id,
            project_id,
            self.config.delete_policy
        );
        self.emit_event(DomainEvent::DocumentsDeleted {
            project_id: project_id.to_string(),
            ids: plan.deleted_ids.clone(),
            updates: plan.updates.clone(),
        });

        Ok(plan)
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "document_service_test.rs"]
mod document_service_test;
