//! Teamspace Core Document Tree Engine
//!
//! This crate provides the document hierarchy of a team workspace: each
//! project holds a forest of documents, ordered within sibling groups, that
//! users rearrange by drag and drop.
//!
//! # Architecture
//!
//! - **Pure tree engine**: grouping, move computation, removal planning and
//!   invariant checks are stateless functions over a project snapshot
//! - **Batch persistence**: every mutation is handed to a `DocumentStore` as
//!   one all-or-nothing unit
//! - **Per-project serialization**: mutations of the same project never
//!   interleave their read-compute-write cycles
//! - **Events after commit**: subscribers hear about a change only once it
//!   is stored
//!
//! # Modules
//!
//! - [`models`] - Data structures (Document, PositionUpdate, etc.)
//! - [`tree`] - Pure tree computations
//! - [`services`] - DocumentService and project locking
//! - [`db`] - Storage trait, in-memory store and domain events
//! - [`utils`] - Slug generation
//! - [`config`] - Engine configuration

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod tree;
pub mod utils;

// Re-export commonly used types
pub use config::TreeConfig;
pub use models::*;
pub use services::*;
pub use tree::{build_tree, compute_move, MoveOutcome, MoveRequest, TreeError};
