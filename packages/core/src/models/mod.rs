//! Data Models
//!
//! This module contains the data structures shared by the tree engine and the
//! persistence layer:
//!
//! - `Document` - A node in a project's document forest
//! - `NewDocument` / `DocumentPatch` - Creation and tree-neutral edit requests
//! - `PositionUpdate` - One document's new `(parent_id, position)` placement

mod document;
mod position_update;

pub use document::{Document, DocumentKind, DocumentPatch, NewDocument, ValidationError};
pub use position_update::PositionUpdate;
