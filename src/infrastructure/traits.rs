//! Boundary traits for the admin services
//!
//! Services talk to the tree store, the notification sink and the ACL cache
//! only through these traits, so they can be tested with in-memory or
//! failing implementations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::debug;

use crate::domain::{Forum, ForumId, ForumRecord, Position, Side, TreeId};
use crate::infrastructure::error::StoreResult;

/// Ordered tree storage.
///
/// Implementations must make every mutation atomic: a concurrent reader
/// sees the tree either before or after a relocation, never in between.
pub trait TreeStore: Send + Sync {
    /// All forums of `tree` in pre-order (parent before children, siblings in order).
    fn all_in_traversal_order(&self, tree: TreeId) -> StoreResult<Vec<Forum>>;

    /// Look up a forum in any tree.
    fn get(&self, id: ForumId) -> StoreResult<Option<Forum>>;

    /// Sibling immediately before `forum`, `None` if it is the first.
    fn previous_sibling(&self, forum: &Forum) -> StoreResult<Option<Forum>>;

    /// Sibling immediately after `forum`, `None` if it is the last.
    fn next_sibling(&self, forum: &Forum) -> StoreResult<Option<Forum>>;

    /// Place `forum` immediately left or right of `reference`.
    fn relocate(&self, forum: &Forum, reference: &Forum, side: Side) -> StoreResult<()>;

    /// Create a forum under `parent` (top level of `tree` when `None`).
    fn insert(
        &self,
        tree: TreeId,
        record: ForumRecord,
        parent: Option<&Forum>,
        position: Position,
    ) -> StoreResult<Forum>;

    /// Move `forum` and its subtree under `new_parent` (top level when `None`).
    fn move_node(
        &self,
        forum: &Forum,
        new_parent: Option<&Forum>,
        position: Position,
    ) -> StoreResult<()>;

    /// Persist name and description of `forum`.
    fn save(&self, forum: &Forum) -> StoreResult<()>;

    /// Delete a forum without children.
    fn remove(&self, forum: &Forum) -> StoreResult<()>;
}

/// Sink for user-facing success messages.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
}

/// Invalidates externally cached authorization data after tree mutations.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Messages collected during one session, drained by the caller for display.
#[derive(Debug, Default)]
pub struct SessionMessages {
    messages: Mutex<Vec<String>>,
}

impl SessionMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending messages, oldest first.
    pub fn drain(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(mut messages) => std::mem::take(&mut *messages),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for SessionMessages {
    fn success(&self, message: &str) {
        debug!("notice: {}", message);
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

/// Versioned ACL cache marker: every invalidation bumps the version so
/// readers holding an older version know to rebuild.
#[derive(Debug, Default)]
pub struct CacheBuster {
    version: AtomicU64,
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Whether a cache built at `version` is still valid.
    pub fn is_valid(&self, version: u64) -> bool {
        self.version() == version
    }
}

impl CacheInvalidator for CacheBuster {
    fn invalidate(&self) {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("acl cache invalidated, version {}", version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_messages_when_draining_then_returns_in_order_and_clears() {
        let messages = SessionMessages::new();
        messages.success("one");
        messages.success("two");

        assert_eq!(messages.drain(), vec!["one", "two"]);
        assert!(messages.drain().is_empty());
    }

    #[test]
    fn given_cache_when_invalidating_then_old_version_is_stale() {
        let buster = CacheBuster::new();
        let seen = buster.version();

        buster.invalidate();

        assert!(!buster.is_valid(seen));
        assert!(buster.is_valid(seen + 1));
    }
}
