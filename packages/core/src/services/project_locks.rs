//! Per-project serialization of tree mutations
//!
//! A move reads a full snapshot, computes updates, and writes them back. Two
//! interleaved moves on the same project would both compute against a stale
//! grouping and leave duplicate or gapped positions, so every mutation of a
//! project holds that project's lock from snapshot read to batch write.
//! Different projects never contend.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
pub struct ProjectLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `project_id`.
    ///
    /// The returned guard releases the project when dropped. Entries nobody
    /// holds or waits on are pruned here, so the map stays bounded by the
    /// number of projects currently in use.
    pub async fn lock(&self, project_id: &str) -> OwnedMutexGuard<()> {
        let project_lock = {
            let mut locks = self.locks.lock().await;
            // Holders and waiters each own a clone; a count of 1 means idle
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(project_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        project_lock.lock_owned().await
    }

    /// Number of projects with a live lock entry
    pub async fn tracked_projects(&self) -> usize {
        self.locks.lock().await.len()
    }
}
