//! Business Services
//!
//! This module contains the orchestration layer on top of the tree engine:
//!
//! - `DocumentService` - document CRUD, moves and deletions over a `DocumentStore`
//! - `ProjectLocks` - per-project serialization of tree mutations
//!
//! Services read a project snapshot, let the pure functions in [`crate::tree`]
//! compute the change, persist it as one batch and then notify subscribers.

pub mod document_service;
pub mod error;
pub mod project_locks;

pub use document_service::DocumentService;
pub use error::DocumentServiceError;
pub use project_locks::ProjectLocks;
