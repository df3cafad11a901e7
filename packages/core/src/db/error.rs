//! Storage Error Types
//!
//! Errors raised by `DocumentStore` implementations. A failed batch call
//! must leave the store unchanged.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No document with this ID in the project
    #[error("Document not found: {id}")]
    DocumentNotFound { id: String },

    /// A batch names a document outside the project; nothing was applied
    #[error("Document not in project: {id}")]
    NotInProject { id: String },

    /// Insert with an ID that already exists
    #[error("Document already exists: {id}")]
    DuplicateId { id: String },

    /// Backend failure with context
    #[error("Storage operation failed: {context}")]
    OperationFailed { context: String },
}

impl StoreError {
    pub fn document_not_found(id: impl Into<String>) -> Self {
        Self::DocumentNotFound { id: id.into() }
    }

    pub fn not_in_project(id: impl Into<String>) -> Self {
        Self::NotInProject { id: id.into() }
    }

    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    pub fn operation_failed(context: impl Into<String>) -> Self {
        Self::OperationFailed {
            context: context.into(),
        }
    }
}
