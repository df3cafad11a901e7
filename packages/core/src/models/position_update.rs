//! Placement updates emitted by the tree engine

use serde::{Deserialize, Serialize};

/// Full replacement of one document's tree placement.
///
/// Each update carries the complete `(parent_id, position)` pair rather than
/// a delta, so a batch can be applied in any order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub id: String,
    pub position: u32,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl PositionUpdate {
    pub fn new(id: impl Into<String>, position: u32, parent_id: Option<String>) -> Self {
        Self {
            id: id.into(),
            position,
            parent_id,
        }
    }
}
