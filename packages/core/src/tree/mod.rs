//! Document Tree Engine
//!
//! Pure, stateless functions over a snapshot of one project's documents:
//!
//! - [`build_tree`] - group documents into ordered sibling groups
//! - [`compute_move`] - turn a drag-and-drop intent into placement updates
//! - [`compute_removal`] - plan a deletion under a [`DeletePolicy`]
//! - [`validate_tree`] - check the structural invariants
//!
//! Nothing here performs I/O or holds state between calls. Callers must hand
//! in a consistent snapshot and apply the returned updates as one unit before
//! the next mutation of the same project reads its snapshot.

mod error;
mod grouping;
mod placement;
mod removal;
mod reorder;
mod validation;


pub use error::{TreeError, TreeErrorKind};
pub use grouping::{build_tree, DocumentTreeNode, GroupKey, GroupedTree};
pub use placement::{next_position, next_root_position};
pub use removal::{compute_removal, DeletePolicy, RemovalPlan};
pub use reorder::{compute_move, compute_move_by_ids, MoveMode, MoveOutcome, MoveRequest};
pub use validation::{
    apply_updates, apply_updates_in_place, is_ancestor, validate_tree, InvariantViolation,
};
