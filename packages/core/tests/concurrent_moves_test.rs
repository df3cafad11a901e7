//! Concurrency Tests
//!
//! Many moves and creations racing on one project must still leave every
//! sibling group dense and the forest acyclic.

#[cfg(test)]
mod concurrent_moves_tests {
    use anyhow::Result;
    use std::sync::Arc;
    use teamspace_core::db::InMemoryDocumentStore;
    use teamspace_core::models::Document;
    use teamspace_core::services::DocumentService;
    use teamspace_core::tree::{validate_tree, MoveRequest};
    use tokio::task::JoinSet;

    fn doc(id: String, project: &str, parent: Option<&str>, position: u32) -> Document {
        Document::new_with_id(id.clone(), "org", project, id.clone(), id, "user")
            .placed(parent, position)
    }

    /// Eight roots with four children each
    fn seed(project: &str) -> Vec<Document> {
        let mut docs = Vec::new();
        for r in 0..8u32 {
            let root = format!("{}-r{}", project, r);
            for c in 0..4u32 {
                docs.push(doc(format!("{}c{}", root, c), project, Some(root.as_str()), c));
            }
            docs.push(doc(root, project, None, r));
        }
        docs
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_moves_keep_tree_valid() -> Result<()> {
        let docs = seed("p");
        let ids: Vec<String> = docs.iter().map(|d| d.id.clone()).collect();
        let service = DocumentService::new(Arc::new(InMemoryDocumentStore::with_documents(docs)));

        let mut tasks = JoinSet::new();
        for i in 0..64usize {
            let service = service.clone();
            let source = ids[(i * 7) % ids.len()].clone();
            let target = ids[(i * 13 + 5) % ids.len()].clone();
            let reparent = i % 3 == 0;
            tasks.spawn(async move {
                // Cycle rejections are expected; they must simply write nothing
                let _ = service
                    .move_document("p", &MoveRequest::new(source, target, reparent))
                    .await;
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined?;
        }

        let documents = service.list_documents("p").await?;
        assert_eq!(documents.len(), 40);
        if let Err(violations) = validate_tree(&documents) {
            panic!("tree broken after concurrent moves: {:?}", violations);
        }

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_slugs_and_positions() -> Result<()> {
        let service = DocumentService::new(Arc::new(InMemoryDocumentStore::new()));

        let mut tasks = JoinSet::new();
        for _ in 0..20 {
            let service = service.clone();
            tasks.spawn(async move {
                service
                    .create_document(teamspace_core::models::NewDocument {
                        organization_id: "org".to_string(),
                        project_id: "p".to_string(),
                        title: "Standup".to_string(),
                        content: None,
                        kind: Default::default(),
                        created_by: "user".to_string(),
                    })
                    .await
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined??;
        }

        let documents = service.list_documents("p").await?;
        let mut slugs: Vec<&str> = documents.iter().map(|d| d.slug.as_str()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), 20);
        assert!(validate_tree(&documents).is_ok());

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_projects_do_not_interfere() -> Result<()> {
        let mut docs = seed("left");
        docs.extend(seed("right"));
        let service = DocumentService::new(Arc::new(InMemoryDocumentStore::with_documents(docs)));

        let left = {
            let service = service.clone();
            tokio::spawn(async move {
                for r in 1..8 {
                    service
                        .move_document(
                            "left",
                            &MoveRequest::reorder(format!("left-r{}", r), "left-r0"),
                        )
                        .await?;
                }
                anyhow::Ok(())
            })
        };
        let right = {
            let service = service.clone();
            tokio::spawn(async move {
                for r in 1..8 {
                    service
                        .move_document(
                            "right",
                            &MoveRequest::reparent(format!("right-r{}", r), "right-r0"),
                        )
                        .await?;
                }
                anyhow::Ok(())
            })
        };
        left.await??;
        right.await??;

        let left_docs = service.list_documents("left").await?;
        let right_docs = service.list_documents("right").await?;
        assert!(validate_tree(&left_docs).is_ok());
        assert!(validate_tree(&right_docs).is_ok());

        let right_roots = right_docs.iter().filter(|d| d.is_root()).count();
        assert_eq!(right_roots, 1);

        Ok(())
    }
}
