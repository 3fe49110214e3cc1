use std::collections::{BTreeMap, HashMap};

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{Forum, ForumId, ForumRecord, Side, TreeId};
use crate::domain::error::DomainError;

/// Result type for arena operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Tree node in the arena-based forum forest.
#[derive(Debug, Clone)]
pub struct ForumNode {
    pub id: ForumId,
    pub tree_id: TreeId,
    pub record: ForumRecord,
    /// Index of parent node in the arena, None for top-level forums
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in sibling order
    pub children: Vec<Index>,
}

/// Arena-based forest holding every tree of a forum store.
///
/// Each tree is an ordered list of top-level nodes keyed by `TreeId`.
/// Levels are never stored; they are derived from depth on traversal,
/// so relocating a subtree needs no renumbering.
#[derive(Debug, Clone)]
pub struct ForumArena {
    arena: Arena<ForumNode>,
    trees: BTreeMap<TreeId, Vec<Index>>,
    ids: HashMap<ForumId, Index>,
    next_id: u64,
}

impl Default for ForumArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ForumArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            trees: BTreeMap::new(),
            ids: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Id the next `insert` will allocate.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Never allocate ids below `next_id`, even if those forums are gone.
    pub fn reserve_ids(&mut self, next_id: u64) {
        self.next_id = self.next_id.max(next_id);
    }

    /// Trees that currently hold at least one forum, ascending.
    pub fn tree_ids(&self) -> impl Iterator<Item = TreeId> + '_ {
        self.trees
            .iter()
            .filter(|(_, top)| !top.is_empty())
            .map(|(tree, _)| *tree)
    }

    /// Insert a forum as the last child of `parent`, or as the last
    /// top-level forum of `tree` when `parent` is `None`.
    #[instrument(level = "trace", skip(self, record))]
    pub fn insert(
        &mut self,
        tree: TreeId,
        parent: Option<ForumId>,
        record: ForumRecord,
    ) -> DomainResult<Forum> {
        let id = ForumId(self.next_id);
        self.insert_with_id(id, tree, parent, record)
    }

    /// Insert a forum under a caller-chosen id (used when loading snapshots).
    #[instrument(level = "trace", skip(self, record))]
    pub fn insert_with_id(
        &mut self,
        id: ForumId,
        tree: TreeId,
        parent: Option<ForumId>,
        record: ForumRecord,
    ) -> DomainResult<Forum> {
        if self.ids.contains_key(&id) {
            return Err(DomainError::DuplicateId(id));
        }
        let parent_idx = match parent {
            Some(parent_id) => {
                let idx = self.index_of(parent_id)?;
                self.ensure_tree(idx, tree)?;
                Some(idx)
            }
            None => None,
        };

        let node_idx = self.arena.insert(ForumNode {
            id,
            tree_id: tree,
            record,
            parent: parent_idx,
            children: Vec::new(),
        });
        self.attach_last(node_idx, parent_idx, tree);
        self.ids.insert(id, node_idx);
        self.next_id = self.next_id.max(id.0 + 1);

        self.snapshot(node_idx).ok_or(DomainError::UnknownForum(id))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, id: ForumId) -> Option<Forum> {
        self.ids.get(&id).and_then(|&idx| self.snapshot(idx))
    }

    /// All forums of `tree` in pre-order.
    #[instrument(level = "trace", skip(self))]
    pub fn traverse(&self, tree: TreeId) -> Vec<Forum> {
        self.iter_tree(tree)
            .map(|(_, node, level)| self.to_forum(node, level))
            .collect()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_tree(&self, tree: TreeId) -> PreOrderIterator {
        PreOrderIterator::new(self, tree)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn previous_sibling(&self, id: ForumId) -> DomainResult<Option<Forum>> {
        self.adjacent_sibling(id, Side::Left)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn next_sibling(&self, id: ForumId) -> DomainResult<Option<Forum>> {
        self.adjacent_sibling(id, Side::Right)
    }

    /// Place `id` immediately left or right of `reference`, adopting the
    /// reference's parent. The subtree under `id` moves with it.
    #[instrument(level = "trace", skip(self))]
    pub fn relocate(&mut self, id: ForumId, reference: ForumId, side: Side) -> DomainResult<()> {
        if id == reference {
            return Err(DomainError::SelfReference(id));
        }
        let idx = self.index_of(id)?;
        let ref_idx = self.index_of(reference)?;
        let tree = self
            .node(idx)
            .ok_or(DomainError::UnknownForum(id))?
            .tree_id;
        self.ensure_tree(ref_idx, tree)?;
        if self.is_within_subtree(ref_idx, idx) {
            return Err(DomainError::WouldCreateCycle {
                forum: id,
                parent: reference,
            });
        }
        let ref_parent = self
            .node(ref_idx)
            .ok_or(DomainError::UnknownForum(reference))?
            .parent;

        self.detach(idx);
        let siblings = self
            .siblings_mut(ref_parent, tree)
            .ok_or(DomainError::UnknownForum(reference))?;
        let pos = siblings
            .iter()
            .position(|&s| s == ref_idx)
            .ok_or(DomainError::UnknownForum(reference))?;
        let at = match side {
            Side::Left => pos,
            Side::Right => pos + 1,
        };
        siblings.insert(at, idx);
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = ref_parent;
        }
        Ok(())
    }

    /// Move `id` (with its subtree) to the end of `new_parent`'s children,
    /// or to the end of its tree's top level when `new_parent` is `None`.
    #[instrument(level = "trace", skip(self))]
    pub fn move_to(&mut self, id: ForumId, new_parent: Option<ForumId>) -> DomainResult<()> {
        let idx = self.index_of(id)?;
        let tree = self
            .node(idx)
            .ok_or(DomainError::UnknownForum(id))?
            .tree_id;
        let parent_idx = match new_parent {
            Some(parent_id) => {
                let p_idx = self.index_of(parent_id)?;
                self.ensure_tree(p_idx, tree)?;
                if self.is_within_subtree(p_idx, idx) {
                    return Err(DomainError::WouldCreateCycle {
                        forum: id,
                        parent: parent_id,
                    });
                }
                Some(p_idx)
            }
            None => None,
        };

        self.detach(idx);
        self.attach_last(idx, parent_idx, tree);
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = parent_idx;
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self, record))]
    pub fn update(&mut self, id: ForumId, record: ForumRecord) -> DomainResult<()> {
        let idx = self.index_of(id)?;
        let node = self
            .arena
            .get_mut(idx)
            .ok_or(DomainError::UnknownForum(id))?;
        node.record = record;
        Ok(())
    }

    /// Remove a leaf forum. Forums with children are rejected.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, id: ForumId) -> DomainResult<Forum> {
        let idx = self.index_of(id)?;
        let node = self.node(idx).ok_or(DomainError::UnknownForum(id))?;
        if !node.children.is_empty() {
            return Err(DomainError::HasChildren(id));
        }
        let forum = self.snapshot(idx).ok_or(DomainError::UnknownForum(id))?;
        self.detach(idx);
        self.arena.remove(idx);
        self.ids.remove(&id);
        Ok(forum)
    }

    fn adjacent_sibling(&self, id: ForumId, side: Side) -> DomainResult<Option<Forum>> {
        let idx = self.index_of(id)?;
        let node = self.node(idx).ok_or(DomainError::UnknownForum(id))?;
        let siblings = self.siblings(node);
        let pos = siblings
            .iter()
            .position(|&s| s == idx)
            .ok_or(DomainError::UnknownForum(id))?;
        let neighbour = match side {
            Side::Left => pos.checked_sub(1).and_then(|p| siblings.get(p)),
            Side::Right => siblings.get(pos + 1),
        };
        Ok(neighbour.and_then(|&n| self.snapshot(n)))
    }

    fn index_of(&self, id: ForumId) -> DomainResult<Index> {
        self.ids
            .get(&id)
            .copied()
            .ok_or(DomainError::UnknownForum(id))
    }

    fn node(&self, idx: Index) -> Option<&ForumNode> {
        self.arena.get(idx)
    }

    fn ensure_tree(&self, idx: Index, expected: TreeId) -> DomainResult<()> {
        match self.node(idx) {
            Some(node) if node.tree_id != expected => Err(DomainError::CrossTree {
                forum: node.id,
                tree: node.tree_id,
                expected,
            }),
            _ => Ok(()),
        }
    }

    /// True when `candidate` is `root` or one of its descendants.
    fn is_within_subtree(&self, candidate: Index, root: Index) -> bool {
        let mut current = Some(candidate);
        while let Some(idx) = current {
            if idx == root {
                return true;
            }
            current = self.arena.get(idx).and_then(|n| n.parent);
        }
        false
    }

    fn siblings(&self, node: &ForumNode) -> &[Index] {
        match node.parent {
            Some(p) => self
                .arena
                .get(p)
                .map(|n| n.children.as_slice())
                .unwrap_or(&[]),
            None => self
                .trees
                .get(&node.tree_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    fn siblings_mut(&mut self, parent: Option<Index>, tree: TreeId) -> Option<&mut Vec<Index>> {
        match parent {
            Some(p) => self.arena.get_mut(p).map(|n| &mut n.children),
            None => Some(self.trees.entry(tree).or_default()),
        }
    }

    fn attach_last(&mut self, idx: Index, parent: Option<Index>, tree: TreeId) {
        if let Some(siblings) = self.siblings_mut(parent, tree) {
            siblings.push(idx);
        }
    }

    fn detach(&mut self, idx: Index) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        let (parent, tree) = (node.parent, node.tree_id);
        if let Some(siblings) = self.siblings_mut(parent, tree) {
            siblings.retain(|&s| s != idx);
        }
    }

    fn level_of(&self, idx: Index) -> u32 {
        let mut level = 1;
        let mut current = self.arena.get(idx).and_then(|n| n.parent);
        while let Some(p) = current {
            level += 1;
            current = self.arena.get(p).and_then(|n| n.parent);
        }
        level
    }

    fn snapshot(&self, idx: Index) -> Option<Forum> {
        let node = self.arena.get(idx)?;
        Some(self.to_forum(node, self.level_of(idx)))
    }

    fn to_forum(&self, node: &ForumNode, level: u32) -> Forum {
        Forum {
            id: node.id,
            parent_id: node.parent.and_then(|p| self.arena.get(p)).map(|n| n.id),
            tree_id: node.tree_id,
            level,
            name: node.record.name.clone(),
            description: node.record.description.clone(),
        }
    }
}

/// Depth-first, left-to-right walk over one tree, yielding each node with its level.
pub struct PreOrderIterator<'a> {
    arena: &'a ForumArena,
    stack: Vec<(Index, u32)>,
}

impl<'a> PreOrderIterator<'a> {
    #[instrument(level = "trace", skip(arena))]
    fn new(arena: &'a ForumArena, tree: TreeId) -> Self {
        let stack = arena
            .trees
            .get(&tree)
            .map(|top| top.iter().rev().map(|&idx| (idx, 1)).collect())
            .unwrap_or_default();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a ForumNode, u32);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, level)) = self.stack.pop() {
            if let Some(node) = self.arena.arena.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, level + 1));
                }
                return Some((current_idx, node, level));
            }
        }
        None
    }
}
