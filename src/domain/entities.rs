//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a forum node, allocated by the tree store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForumId(pub u64);

impl fmt::Display for ForumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a top-level tree in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeId(pub u64);

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The only tree the admin surface operates on.
/// Nodes in any other tree are treated as nonexistent.
pub const DESIGNATED_TREE: TreeId = TreeId(1);

/// Snapshot of a forum node as handed out by the tree store.
///
/// The store owns the node; a `Forum` is a copy valid for one request.
/// Its position is not stored here, it is only observable through
/// traversal order and sibling queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forum {
    pub id: ForumId,
    /// Owning node, `None` for top-level forums
    pub parent_id: Option<ForumId>,
    pub tree_id: TreeId,
    /// Depth in the tree, top-level = 1
    pub level: u32,
    pub name: String,
    pub description: String,
}

impl Forum {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl fmt::Display for Forum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [#{}]", self.name, self.id)
    }
}

/// Field values for a node the store has not allocated yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumRecord {
    pub name: String,
    pub description: String,
}

/// Request to create a forum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewForum {
    pub name: String,
    pub description: String,
    /// `None` creates a top-level forum in the designated tree
    pub parent: Option<ForumId>,
}

/// Requested parent for an edited forum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentChoice {
    TopLevel,
    Forum(ForumId),
}

impl ParentChoice {
    pub fn id(&self) -> Option<ForumId> {
        match self {
            ParentChoice::TopLevel => None,
            ParentChoice::Forum(id) => Some(*id),
        }
    }
}

/// Partial update of a forum. `None` fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForumChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub new_parent: Option<ParentChoice>,
}

/// Direction of a sibling reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Side of the adjacent sibling the target is relocated to.
    pub fn side(&self) -> Side {
        match self {
            Direction::Up => Side::Left,
            Direction::Down => Side::Right,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Placement relative to a reference sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Immediately before the reference
    Left,
    /// Immediately after the reference
    Right,
}

/// Placement under a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    LastChild,
}

/// Result of a sibling reorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Target was relocated past `sibling`
    Moved { sibling: Forum },
    /// No adjacent sibling in the requested direction; nothing changed
    Unchanged,
}

impl ReorderOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, ReorderOutcome::Moved { .. })
    }
}
