//! Creation-time placement

use crate::models::Document;

/// Position for a document appended to the sibling group of `parent_id`.
///
/// Equal to the current size of that group, so appending keeps the group
/// dense.
pub fn next_position(documents: &[Document], parent_id: Option<&str>) -> u32 {
    documents
        .iter()
        .filter(|d| d.parent_id.as_deref() == parent_id)
        .count() as u32
}

/// Position for a newly created document: the end of the root level
pub fn next_root_position(documents: &[Document]) -> u32 {
    next_position(documents, None)
}
