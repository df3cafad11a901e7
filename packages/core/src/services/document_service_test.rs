//! Tests for DocumentService
//!
//! Tests cover:
//! - Creation: slug uniqueness and root-level append
//! - Moves: persisted batches, no-ops, rejections
//! - Deletion under both policies
//! - Event emission only after a successful store call

#[cfg(test)]
mod tests {
    use crate::config::TreeConfig;
    use crate::db::{DocumentStore, DomainEvent, InMemoryDocumentStore, StoreError};
    use crate::models::{Document, DocumentPatch, NewDocument, PositionUpdate};
    use crate::services::{DocumentService, DocumentServiceError};
    use crate::tree::{DeletePolicy, MoveOutcome, MoveRequest, RemovalPlan, TreeErrorKind};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    fn doc(id: &str, parent: Option<&str>, position: u32) -> Document {
        Document::new_with_id(id, "org", "proj", id, id, "user").placed(parent, position)
    }

    fn new_doc(title: &str) -> NewDocument {
        NewDocument {
            organization_id: "org".to_string(),
            project_id: "proj".to_string(),
            title: title.to_string(),
            content: None,
            kind: Default::default(),
            created_by: "user".to_string(),
        }
    }

    /// a(a0, a1), b
    fn seeded_service(policy: DeletePolicy) -> DocumentService {
        let store = InMemoryDocumentStore::with_documents(vec![
            doc("a", None, 0),
            doc("b", None, 1),
            doc("a0", Some("a"), 0),
            doc("a1", Some("a"), 1),
        ]);
        let config = TreeConfig {
            delete_policy: policy,
            ..TreeConfig::default()
        };
        DocumentService::with_config(Arc::new(store), config)
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    /// Store whose batch writes always fail
    struct BrokenStore {
        inner: InMemoryDocumentStore,
    }

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, StoreError> {
            self.inner.list_documents(project_id).await
        }

        async fn get_document(
            &self,
            project_id: &str,
            id: &str,
        ) -> Result<Option<Document>, StoreError> {
            self.inner.get_document(project_id, id).await
        }

        async fn insert_document(&self, document: Document) -> Result<Document, StoreError> {
            self.inner.insert_document(document).await
        }

        async fn patch_document(
            &self,
            project_id: &str,
            id: &str,
            patch: &DocumentPatch,
            edited_by: Option<&str>,
        ) -> Result<Document, StoreError> {
            self.inner.patch_document(project_id, id, patch, edited_by).await
        }

        async fn apply_position_updates(
            &self,
            _project_id: &str,
            _updates: &[PositionUpdate],
        ) -> Result<(), StoreError> {
            Err(StoreError::operation_failed("disk full"))
        }

        async fn apply_removal(&self, _project_id: &str, _plan: &RemovalPlan) -> Result<(), StoreError> {
            Err(StoreError::operation_failed("disk full"))
        }

        async fn slug_exists(&self, project_id: &str, slug: &str) -> Result<bool, StoreError> {
            self.inner.slug_exists(project_id, slug).await
        }
    }

    #[tokio::test]
    async fn test_create_assigns_unique_slugs_and_appends_to_root() {
        let service = DocumentService::new(Arc::new(InMemoryDocumentStore::new()));

        let first = service.create_document(new_doc("Intro")).await.unwrap();
        let second = service.create_document(new_doc("Intro")).await.unwrap();
        let third = service.create_document(new_doc("Meeting Notes!")).await.unwrap();

        assert_eq!(first.slug, "intro");
        assert_eq!(second.slug, "intro-1");
        assert_eq!(third.slug, "meeting-notes");
        assert_eq!(
            (first.position, second.position, third.position),
            (0, 1, 2)
        );
        assert!(first.parent_id.is_none());
        assert!(first.id.starts_with("doc_"));
        assert!(service.check_tree("proj").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_unsluggable_title_falls_back() {
        let service = DocumentService::new(Arc::new(InMemoryDocumentStore::new()));

        let created = service.create_document(new_doc("!!!")).await.unwrap();

        assert!(created.slug.starts_with("untitled-"), "got {}", created.slug);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let service = DocumentService::new(Arc::new(InMemoryDocumentStore::new()));

        let err = service.create_document(new_doc("   ")).await.unwrap_err();

        assert!(matches!(err, DocumentServiceError::ValidationFailed(_)));
        assert!(service.list_documents("proj").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_document_by_id_or_slug() {
        let service = DocumentService::new(Arc::new(InMemoryDocumentStore::new()));
        let created = service.create_document(new_doc("Roadmap")).await.unwrap();

        let by_id = service.get_document("proj", &created.id).await.unwrap();
        let by_slug = service.get_document("proj", "roadmap").await.unwrap();
        assert_eq!(by_id.id, by_slug.id);

        let err = service.get_document("proj", "missing").await.unwrap_err();
        assert!(matches!(err, DocumentServiceError::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn test_move_persists_batch_and_emits_event() {
        let service = seeded_service(DeletePolicy::default());
        let mut events = service.subscribe_to_events();

        let outcome = service
            .move_document("proj", &MoveRequest::reparent("b", "a"))
            .await
            .unwrap();

        assert_eq!(
            outcome.updates(),
            &[PositionUpdate::new("b", 2, Some("a".to_string()))]
        );

        let tree = service.document_tree("proj").await.unwrap();
        assert_eq!(ids(tree.roots()), vec!["a"]);
        assert_eq!(ids(tree.children_of("a")), vec!["a0", "a1", "b"]);

        match events.try_recv().unwrap() {
            DomainEvent::TreeReordered { project_id, updates } => {
                assert_eq!(project_id, "proj");
                assert_eq!(updates, outcome.into_updates());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_noop_move_emits_nothing() {
        let service = seeded_service(DeletePolicy::default());
        let mut events = service.subscribe_to_events();

        let outcome = service
            .move_document("proj", &MoveRequest::reorder("a0", "a0"))
            .await
            .unwrap();

        assert_eq!(outcome, MoveOutcome::NoOp);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cycle_rejection_writes_nothing() {
        let service = seeded_service(DeletePolicy::default());
        let before = service.list_documents("proj").await.unwrap();

        let err = service
            .move_document("proj", &MoveRequest::reparent("a", "a1"))
            .await
            .unwrap_err();

        assert_eq!(err.tree_error_kind(), Some(TreeErrorKind::CycleRejected));
        assert!(err.is_rejection());
        assert_eq!(service.list_documents("proj").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_move_with_unknown_target_is_rejected() {
        let service = seeded_service(DeletePolicy::default());

        let err = service
            .move_document("proj", &MoveRequest::reorder("a", "ghost"))
            .await
            .unwrap_err();

        assert_eq!(err.tree_error_kind(), Some(TreeErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_failed_store_call_emits_no_event() {
        let store = BrokenStore {
            inner: InMemoryDocumentStore::with_documents(vec![doc("a", None, 0), doc("b", None, 1)]),
        };
        let service = DocumentService::new(Arc::new(store));
        let mut events = service.subscribe_to_events();

        let err = service
            .move_document("proj", &MoveRequest::reorder("b", "a"))
            .await
            .unwrap_err();

        assert!(matches!(err, DocumentServiceError::Store(_)));
        assert!(!err.is_rejection());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_delete_reparents_children_by_default() {
        let service = seeded_service(DeletePolicy::ReparentToGrandparent);

        let plan = service.delete_document("proj", "a").await.unwrap();

        assert_eq!(plan.deleted_ids, vec!["a".to_string()]);
        let tree = service.document_tree("proj").await.unwrap();
        assert_eq!(ids(tree.roots()), vec!["a0", "a1", "b"]);
        assert!(service.check_tree("proj").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascade_removes_subtree() {
        let service = seeded_service(DeletePolicy::CascadeSubtree);
        let mut events = service.subscribe_to_events();

        let plan = service.delete_document("proj", "a").await.unwrap();

        assert_eq!(plan.deleted_ids.len(), 3);
        let remaining = service.list_documents("proj").await.unwrap();
        assert_eq!(ids(&remaining), vec!["b"]);
        assert_eq!(remaining[0].position, 0);
        assert_eq!(events.try_recv().unwrap().event_type(), "documents:deleted");
    }

    #[tokio::test]
    async fn test_delete_missing_document() {
        let service = seeded_service(DeletePolicy::default());

        let err = service.delete_document("proj", "ghost").await.unwrap_err();

        assert!(matches!(err, DocumentServiceError::DocumentNotFound { id } if id == "ghost"));
    }

    #[tokio::test]
    async fn test_update_is_tree_neutral() {
        let service = seeded_service(DeletePolicy::default());

        let updated = service
            .update_document(
                "proj",
                "a1",
                &DocumentPatch::new()
                    .with_title("Renamed")
                    .with_content(json!({"type": "doc"})),
                Some("editor"),
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.last_edited_by.as_deref(), Some("editor"));
        assert_eq!(updated.parent_id.as_deref(), Some("a"));
        assert_eq!(updated.position, 1);

        let err = service
            .update_document("proj", "ghost", &DocumentPatch::new().with_title("x"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentServiceError::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn test_nested_tree() {
        let service = seeded_service(DeletePolicy::default());

        let nested = service.nested_tree("proj").await.unwrap();

        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].document.id, "a");
        assert_eq!(nested[0].children.len(), 2);
    }
}
