//! Sibling Grouping
//!
//! Builds the per-project index of sibling groups: documents bucketed by
//! `parent_id` (with [`GroupKey::Root`] for top-level documents), each bucket
//! ordered by ascending `position`.
//!
//! # Tolerance
//!
//! Building a grouping never fails. Duplicate positions keep their input
//! order, and dangling or cyclic parent references are grouped as-is so a
//! damaged project can still be displayed. Structural checks belong to
//! [`crate::tree::validate_tree`] and the move computation.

use crate::models::Document;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Identifies one sibling group within a project
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    /// Top-level documents (`parent_id = None`)
    Root,
    /// Children of the document with this ID
    Parent(String),
}

impl GroupKey {
    pub fn of(document: &Document) -> Self {
        Self::from_parent(document.parent_id.as_deref())
    }

    pub fn from_parent(parent_id: Option<&str>) -> Self {
        match parent_id {
            Some(id) => GroupKey::Parent(id.to_string()),
            None => GroupKey::Root,
        }
    }

    /// The `parent_id` every member of this group carries
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            GroupKey::Root => None,
            GroupKey::Parent(id) => Some(id.as_str()),
        }
    }
}

/// Group borrowed documents by parent, each group stably sorted by position.
///
/// Also returns the group keys in first-seen order so callers can iterate
/// deterministically.
pub(crate) fn group_refs(documents: &[Document]) -> (HashMap<GroupKey, Vec<&Document>>, Vec<GroupKey>) {
    let mut groups: HashMap<GroupKey, Vec<&Document>> = HashMap::new();
    let mut order = Vec::new();

    for document in documents {
        let key = GroupKey::of(document);
        let members = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Vec::new()
        });
        members.push(document);
    }

    for members in groups.values_mut() {
        // sort_by_key is stable: equal positions keep input order
        members.sort_by_key(|d| d.position);
    }

    (groups, order)
}

/// Documents of one project, indexed by sibling group
#[derive(Debug, Clone, Default)]
pub struct GroupedTree {
    groups: HashMap<GroupKey, Vec<Document>>,
    order: Vec<GroupKey>,
    len: usize,
}

impl GroupedTree {
    /// Root-level documents in display order
    pub fn roots(&self) -> &[Document] {
        self.group(&GroupKey::Root)
    }

    /// Children of `parent_id` in display order (empty if it has none)
    pub fn children_of(&self, parent_id: &str) -> &[Document] {
        self.groups
            .get(&GroupKey::Parent(parent_id.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn group(&self, key: &GroupKey) -> &[Document] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All groups, in the order their first member appeared in the input
    pub fn groups(&self) -> impl Iterator<Item = (&GroupKey, &[Document])> {
        self.order
            .iter()
            .filter_map(|key| self.groups.get(key).map(|docs| (key, docs.as_slice())))
    }

    /// Total number of documents
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nested view for display, starting from the root group.
    ///
    /// Each document appears exactly once. Documents that cannot be reached
    /// from the root level (dangling parent, or caught in a cycle) are
    /// appended as extra top-level entries rather than hidden.
    pub fn to_nested(&self) -> Vec<DocumentTreeNode> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut nested = Vec::new();

        for root in self.roots() {
            if let Some(node) = self.nest(root, &mut visited) {
                nested.push(node);
            }
        }

        for key in &self.order {
            for document in self.group(key) {
                if visited.contains(document.id.as_str()) {
                    continue;
                }
                tracing::debug!(
                    "Document '{}' is unreachable from the root level, listing it top-level",
                    document.id
                );
                if let Some(node) = self.nest(document, &mut visited) {
                    nested.push(node);
                }
            }
        }

        nested
    }

    fn nest<'a>(
        &'a self,
        document: &'a Document,
        visited: &mut HashSet<&'a str>,
    ) -> Option<DocumentTreeNode> {
        if !visited.insert(document.id.as_str()) {
            return None;
        }

        let children = self
            .children_of(&document.id)
            .iter()
            .filter_map(|child| self.nest(child, visited))
            .collect();

        Some(DocumentTreeNode {
            document: document.clone(),
            children,
        })
    }
}

/// A document together with its ordered children
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTreeNode {
    #[serde(flatten)]
    pub document: Document,
    pub children: Vec<DocumentTreeNode>,
}

impl DocumentTreeNode {
    /// Number of documents in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }
}

/// Group a project's documents by parent, ordered by position.
///
/// Pure and deterministic: no validation, no errors. Ties in `position` keep
/// the input order.
pub fn build_tree(documents: &[Document]) -> GroupedTree {
    let (groups, order) = group_refs(documents);

    let groups = groups
        .into_iter()
        .map(|(key, members)| (key, members.into_iter().cloned().collect()))
        .collect();

    GroupedTree {
        groups,
        order,
        len: documents.len(),
    }
}
