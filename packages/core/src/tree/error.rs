//! Tree Engine Error Types
//!
//! Every error here is a logical rejection of a requested mutation. A
//! rejected mutation never produces updates, so nothing needs rolling back
//! and retrying the same request cannot succeed.

use thiserror::Error;

/// Coarse classification surfaced to callers that only need the category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeErrorKind {
    NotFound,
    CycleRejected,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The dragged (or deleted) document is absent from the snapshot
    #[error("Document not in tree: {id}")]
    SourceNotFound { id: String },

    /// The drop target is absent from the snapshot
    #[error("Target not in tree: {id}")]
    TargetNotFound { id: String },

    /// The move would make a document its own ancestor
    #[error("Invalid move: would create cycle (moving {document_id} under {new_parent_id})")]
    CycleRejected {
        document_id: String,
        new_parent_id: String,
    },
}

impl TreeError {
    pub fn source_not_found(id: impl Into<String>) -> Self {
        Self::SourceNotFound { id: id.into() }
    }

    pub fn target_not_found(id: impl Into<String>) -> Self {
        Self::TargetNotFound { id: id.into() }
    }

    pub fn cycle_rejected(document_id: impl Into<String>, new_parent_id: impl Into<String>) -> Self {
        Self::CycleRejected {
            document_id: document_id.into(),
            new_parent_id: new_parent_id.into(),
        }
    }

    pub fn kind(&self) -> TreeErrorKind {
        match self {
            TreeError::SourceNotFound { .. } | TreeError::TargetNotFound { .. } => {
                TreeErrorKind::NotFound
            }
            TreeError::CycleRejected { .. } => TreeErrorKind::CycleRejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TreeError::source_not_found("a").to_string(),
            "Document not in tree: a"
        );
        assert_eq!(
            TreeError::target_not_found("b").to_string(),
            "Target not in tree: b"
        );
        assert!(TreeError::cycle_rejected("a", "c")
            .to_string()
            .starts_with("Invalid move: would create cycle"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(TreeError::source_not_found("a").kind(), TreeErrorKind::NotFound);
        assert_eq!(TreeError::target_not_found("a").kind(), TreeErrorKind::NotFound);
        assert_eq!(
            TreeError::cycle_rejected("a", "b").kind(),
            TreeErrorKind::CycleRejected
        );
    }
}
