//! Persistence Layer
//!
//! This module defines the storage seam the document service talks to:
//!
//! - [`DocumentStore`] - async trait for listing, inserting, patching and
//!   batch-updating a project's documents
//! - [`InMemoryDocumentStore`] - `RwLock`-guarded reference implementation
//! - [`DomainEvent`] - change notifications for read-side caches

mod document_store;
mod error;
pub mod events;
mod memory_store;

pub use document_store::DocumentStore;
pub use error::StoreError;
pub use events::DomainEvent;
pub use memory_store::InMemoryDocumentStore;
