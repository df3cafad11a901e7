//! In-process `DocumentStore`
//!
//! Keeps every project's documents in insertion order behind a tokio
//! `RwLock`. Each batch call validates first and mutates second while holding
//! the write lock, which gives the all-or-nothing behavior the trait asks
//! for. Used by the `doctree` binary and the test suites.

use crate::db::document_store::DocumentStore;
use crate::db::error::StoreError;
use crate::models::{Document, DocumentPatch, PositionUpdate};
use crate::tree::{apply_updates_in_place, RemovalPlan};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    projects: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from an existing snapshot, grouping by project
    pub fn with_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut projects: HashMap<String, Vec<Document>> = HashMap::new();
        for document in documents {
            projects
                .entry(document.project_id.clone())
                .or_default()
                .push(document);
        }
        Self {
            projects: RwLock::new(projects),
        }
    }

    pub async fn document_count(&self, project_id: &str) -> usize {
        self.projects
            .read()
            .await
            .get(project_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn check_membership<'a>(
    documents: &[Document],
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), StoreError> {
    let known: HashSet<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    for id in ids {
        if !known.contains(id) {
            return Err(StoreError::not_in_project(id));
        }
    }
    Ok(())
}

fn place(documents: &mut [Document], updates: &[PositionUpdate]) {
    let now = Utc::now();
    apply_updates_in_place(documents, updates, |document| document.updated_at = now);
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .projects
            .read()
            .await
            .get(project_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_document(
        &self,
        project_id: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .projects
            .read()
            .await
            .get(project_id)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    async fn insert_document(&self, document: Document) -> Result<Document, StoreError> {
        let mut projects = self.projects.write().await;
        let documents = projects.entry(document.project_id.clone()).or_default();

        if documents.iter().any(|d| d.id == document.id) {
            return Err(StoreError::duplicate_id(&document.id));
        }

        documents.push(document.clone());
        Ok(document)
    }

    async fn patch_document(
        &self,
        project_id: &str,
        id: &str,
        patch: &DocumentPatch,
        edited_by: Option<&str>,
    ) -> Result<Document, StoreError> {
        let mut projects = self.projects.write().await;
        let document = projects
            .get_mut(project_id)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::document_not_found(id))?;

        document.apply_patch(patch, edited_by);
        Ok(document.clone())
    }

    async fn apply_position_updates(
        &self,
        project_id: &str,
        updates: &[PositionUpdate],
    ) -> Result<(), StoreError> {
        if updates.is_empty() {
            return Ok(());
        }

        let mut projects = self.projects.write().await;
        let Some(documents) = projects.get_mut(project_id) else {
            return Err(StoreError::not_in_project(&updates[0].id));
        };

        check_membership(documents, updates.iter().map(|u| u.id.as_str()))?;
        place(documents, updates);
        Ok(())
    }

    async fn apply_removal(&self, project_id: &str, plan: &RemovalPlan) -> Result<(), StoreError> {
        let mut projects = self.projects.write().await;
        let documents = projects
            .get_mut(project_id)
            .ok_or_else(|| StoreError::not_in_project(project_id))?;

        check_membership(
            documents,
            plan.deleted_ids
                .iter()
                .map(String::as_str)
                .chain(plan.updates.iter().map(|u| u.id.as_str())),
        )?;

        let deleted: HashSet<&str> = plan.deleted_ids.iter().map(String::as_str).collect();
        documents.retain(|d| !deleted.contains(d.id.as_str()));
        place(documents, &plan.updates);
        Ok(())
    }

    async fn slug_exists(&self, project_id: &str, slug: &str) -> Result<bool, StoreError> {
        Ok(self
            .projects
            .read()
            .await
            .get(project_id)
            .is_some_and(|docs| docs.iter().any(|d| d.slug == slug)))
    }
}
