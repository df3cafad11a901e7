//! Service Layer Error Types
//!
//! This module defines error types for document service operations, wrapping
//! the lower layers' errors with `#[from]` so `?` composes them.

use crate::db::StoreError;
use crate::models::ValidationError;
use crate::tree::{TreeError, TreeErrorKind};
use crate::utils::SlugError;
use thiserror::Error;

/// Service operation errors
#[derive(Error, Debug)]
pub enum DocumentServiceError {
    /// Document not found by ID or slug
    #[error("Document not found: {id}")]
    DocumentNotFound { id: String },

    /// Validation failed for the request
    #[error("Document validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// The tree engine rejected the mutation; nothing was written
    #[error("{0}")]
    Tree(#[from] TreeError),

    /// Storage operation failed
    #[error("Storage operation failed: {0}")]
    Store(#[from] StoreError),

    /// No slug could be assigned
    #[error("Slug assignment failed: {0}")]
    Slug(#[from] SlugError),
}

impl DocumentServiceError {
    /// Create a document not found error
    pub fn document_not_found(id: impl Into<String>) -> Self {
        Self::DocumentNotFound { id: id.into() }
    }

    /// Whether this is a logical rejection (not found, cycle) rather than
    /// an infrastructure failure. Retrying a rejection cannot succeed.
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::DocumentNotFound { .. } | Self::ValidationFailed(_) | Self::Tree(_) => true,
            Self::Store(StoreError::DocumentNotFound { .. } | StoreError::NotInProject { .. }) => {
                true
            }
            Self::Store(_) | Self::Slug(_) => false,
        }
    }

    pub fn tree_error_kind(&self) -> Option<TreeErrorKind> {
        match self {
            Self::Tree(err) => Some(err.kind()),
            _ => None,
        }
    }
}
