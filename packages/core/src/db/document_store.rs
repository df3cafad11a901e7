//! Persistence seam for project documents
//!
//! The tree engine never talks to storage. `DocumentService` reads a full
//! project snapshot through this trait, computes updates, and hands them back
//! as one batch.

use crate::db::error::StoreError;
use crate::models::{Document, DocumentPatch, PositionUpdate};
use crate::tree::RemovalPlan;
use async_trait::async_trait;

/// Durable storage of documents, scoped by project
///
/// Implementations must apply every batch method atomically: either all
/// listed changes become visible or none do.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Full, unordered snapshot of a project's documents
    async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, StoreError>;

    async fn get_document(
        &self,
        project_id: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// Resolve a document by ID, falling back to its slug
    async fn find_by_id_or_slug(
        &self,
        project_id: &str,
        key: &str,
    ) -> Result<Option<Document>, StoreError> {
        let documents = self.list_documents(project_id).await?;
        Ok(documents
            .iter()
            .find(|d| d.id == key)
            .or_else(|| documents.iter().find(|d| d.slug == key))
            .cloned())
    }

    async fn insert_document(&self, document: Document) -> Result<Document, StoreError>;

    /// Tree-neutral edit of one document
    async fn patch_document(
        &self,
        project_id: &str,
        id: &str,
        patch: &DocumentPatch,
        edited_by: Option<&str>,
    ) -> Result<Document, StoreError>;

    /// Apply a placement batch atomically.
    ///
    /// Fails with [`StoreError::NotInProject`] without applying anything if
    /// any update names a document outside `project_id`.
    async fn apply_position_updates(
        &self,
        project_id: &str,
        updates: &[PositionUpdate],
    ) -> Result<(), StoreError>;

    /// Delete `plan.deleted_ids` and apply `plan.updates` as one unit
    async fn apply_removal(&self, project_id: &str, plan: &RemovalPlan) -> Result<(), StoreError>;

    async fn slug_exists(&self, project_id: &str, slug: &str) -> Result<bool, StoreError>;
}
