//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::{ForumId, TreeId};

/// Domain errors represent structural violations of the forum tree.
/// These are independent of storage concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown forum: {0}")]
    UnknownForum(ForumId),

    #[error("forum {forum} cannot be moved below its own subtree ({parent})")]
    WouldCreateCycle { forum: ForumId, parent: ForumId },

    #[error("forum {0} cannot be positioned relative to itself")]
    SelfReference(ForumId),

    #[error("forum {forum} belongs to tree {tree}, not tree {expected}")]
    CrossTree {
        forum: ForumId,
        tree: TreeId,
        expected: TreeId,
    },

    #[error("forum {0} has child forums")]
    HasChildren(ForumId),

    #[error("duplicate forum id: {0}")]
    DuplicateId(ForumId),
}
