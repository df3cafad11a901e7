//! Document Tree Integration Tests
//!
//! Drives the public tree API from JSON snapshots shaped like the document
//! list the client receives.

#[cfg(test)]
mod document_tree_tests {
    use anyhow::Result;
    use serde_json::json;
    use teamspace_core::models::Document;
    use teamspace_core::tree::{
        apply_updates, build_tree, compute_move, compute_removal, validate_tree, DeletePolicy,
        MoveRequest,
    };

    fn snapshot() -> Result<Vec<Document>> {
        let now = "2024-03-01T12:00:00Z";
        let row = |id: &str, parent: Option<&str>, position: Option<u32>| {
            json!({
                "id": id,
                "organizationId": "org-1",
                "projectId": "project-1",
                "parentId": parent,
                "position": position,
                "title": id,
                "slug": id,
                "type": "document",
                "isPublic": false,
                "isArchived": false,
                "createdBy": "user-1",
                "createdAt": now,
                "updatedAt": now,
            })
        };

        Ok(serde_json::from_value(json!([
            row("guide", None, Some(0)),
            row("setup", Some("guide"), Some(0)),
            row("usage", Some("guide"), Some(1)),
            row("faq", None, Some(1)),
            row("legacy", None, None),
        ]))?)
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_null_position_reads_as_zero() -> Result<()> {
        let docs = snapshot()?;
        let legacy = docs.iter().find(|d| d.id == "legacy").expect("legacy row");
        assert_eq!(legacy.position, 0);

        // guide and legacy tie at 0; input order breaks the tie, faq follows
        let tree = build_tree(&docs);
        assert_eq!(ids(tree.roots()), vec!["guide", "legacy", "faq"]);
        Ok(())
    }

    #[test]
    fn test_first_move_repairs_legacy_positions() -> Result<()> {
        let docs = snapshot()?;
        assert!(validate_tree(&docs).is_err());

        let outcome = compute_move(&docs, &MoveRequest::reorder("legacy", "faq"))?;
        let applied = apply_updates(&docs, outcome.updates());

        assert!(validate_tree(&applied).is_ok());
        assert_eq!(ids(build_tree(&applied).roots()), vec!["guide", "legacy", "faq"]);
        Ok(())
    }

    #[test]
    fn test_drag_sequence_round_trip() -> Result<()> {
        let mut docs = snapshot()?;
        docs = apply_updates(
            &docs,
            compute_move(&docs, &MoveRequest::reorder("legacy", "guide"))?.updates(),
        );

        // nest faq under guide, then pull usage out to the top
        for request in [
            MoveRequest::reparent("faq", "guide"),
            MoveRequest::reorder("usage", "legacy"),
        ] {
            let outcome = compute_move(&docs, &request)?;
            docs = apply_updates(&docs, outcome.updates());
            assert!(validate_tree(&docs).is_ok(), "after {:?}", request);
        }

        let tree = build_tree(&docs);
        assert_eq!(ids(tree.roots()), vec!["usage", "legacy", "guide"]);
        assert_eq!(ids(tree.children_of("guide")), vec!["setup", "faq"]);
        Ok(())
    }

    #[test]
    fn test_delete_then_nested_view() -> Result<()> {
        let docs = snapshot()?;
        let docs = apply_updates(
            &docs,
            compute_move(&docs, &MoveRequest::reorder("legacy", "faq"))?.updates(),
        );

        let plan = compute_removal(&docs, "guide", DeletePolicy::ReparentToGrandparent)?;
        let survivors: Vec<Document> = apply_updates(&docs, &plan.updates)
            .into_iter()
            .filter(|d| !plan.deleted_ids.contains(&d.id))
            .collect();

        assert!(validate_tree(&survivors).is_ok());
        let nested = build_tree(&survivors).to_nested();
        let top: Vec<&str> = nested.iter().map(|n| n.document.id.as_str()).collect();
        assert_eq!(top, vec!["setup", "usage", "legacy", "faq"]);
        Ok(())
    }
}
