//! Arena-backed tree stores
//!
//! Both stores keep the forest in a `ForumArena` behind an `RwLock`.
//! Mutations run on a staged copy under the write lock and are swapped in
//! only after they (and, for the file store, the snapshot write) succeed,
//! so a failed operation leaves the tree untouched.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};

use tracing::{debug, instrument};

use crate::domain::{DomainResult, Forum, ForumArena, ForumId, ForumRecord, Position, Side, TreeId};
use crate::infrastructure::error::{StoreError, StoreResult};
use crate::infrastructure::snapshot::{self, Snapshot};
use crate::infrastructure::traits::TreeStore;

/// What happens to a staged arena before it replaces the live one.
pub trait Commit: Send + Sync {
    fn commit(&self, arena: &ForumArena) -> StoreResult<()>;
}

/// Nothing to persist.
#[derive(Debug, Default)]
pub struct InMemory;

impl Commit for InMemory {
    fn commit(&self, _arena: &ForumArena) -> StoreResult<()> {
        Ok(())
    }
}

/// Persist every committed state to a TOML snapshot file.
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl Commit for SnapshotFile {
    fn commit(&self, arena: &ForumArena) -> StoreResult<()> {
        snapshot::write(&self.path, &Snapshot::capture(arena))
    }
}

/// Tree store over a `ForumArena`, parameterized by how commits persist.
#[derive(Debug)]
pub struct ArenaTreeStore<C> {
    arena: RwLock<ForumArena>,
    commit: C,
}

/// Process-local store; contents are lost on exit.
pub type MemoryTreeStore = ArenaTreeStore<InMemory>;

/// Store persisted to a TOML snapshot after every mutation.
pub type FileTreeStore = ArenaTreeStore<SnapshotFile>;

impl Default for MemoryTreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTreeStore {
    pub fn new() -> Self {
        Self::from_arena(ForumArena::new())
    }

    pub fn from_arena(arena: ForumArena) -> Self {
        Self {
            arena: RwLock::new(arena),
            commit: InMemory,
        }
    }
}

impl FileTreeStore {
    /// Open the snapshot at `path`. A missing file is an empty store;
    /// it is created on the first mutation.
    #[instrument(level = "debug", skip(path))]
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let arena = if path.exists() {
            snapshot::load(&path)?
        } else {
            debug!("no snapshot at {}, starting empty", path.display());
            ForumArena::new()
        };
        Ok(Self {
            arena: RwLock::new(arena),
            commit: SnapshotFile { path },
        })
    }

    pub fn path(&self) -> &Path {
        &self.commit.path
    }
}

impl<C: Commit> ArenaTreeStore<C> {
    /// Number of forums across all trees.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, ForumArena>> {
        self.arena.read().map_err(|_| StoreError::Poisoned)
    }

    /// Apply `f` atomically: on any error the live arena is unchanged.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut ForumArena) -> DomainResult<T>) -> StoreResult<T> {
        let mut live = self.arena.write().map_err(|_| StoreError::Poisoned)?;
        let mut staged = (*live).clone();
        let value = f(&mut staged)?;
        self.commit.commit(&staged)?;
        *live = staged;
        Ok(value)
    }
}

impl<C: Commit> TreeStore for ArenaTreeStore<C> {
    fn all_in_traversal_order(&self, tree: TreeId) -> StoreResult<Vec<Forum>> {
        Ok(self.read()?.traverse(tree))
    }

    fn get(&self, id: ForumId) -> StoreResult<Option<Forum>> {
        Ok(self.read()?.get(id))
    }

    fn previous_sibling(&self, forum: &Forum) -> StoreResult<Option<Forum>> {
        Ok(self.read()?.previous_sibling(forum.id)?)
    }

    fn next_sibling(&self, forum: &Forum) -> StoreResult<Option<Forum>> {
        Ok(self.read()?.next_sibling(forum.id)?)
    }

    fn relocate(&self, forum: &Forum, reference: &Forum, side: Side) -> StoreResult<()> {
        self.mutate(|arena| arena.relocate(forum.id, reference.id, side))
    }

    fn insert(
        &self,
        tree: TreeId,
        record: ForumRecord,
        parent: Option<&Forum>,
        position: Position,
    ) -> StoreResult<Forum> {
        match position {
            Position::LastChild => {
                self.mutate(|arena| arena.insert(tree, parent.map(|p| p.id), record))
            }
        }
    }

    fn move_node(
        &self,
        forum: &Forum,
        new_parent: Option<&Forum>,
        position: Position,
    ) -> StoreResult<()> {
        match position {
            Position::LastChild => {
                self.mutate(|arena| arena.move_to(forum.id, new_parent.map(|p| p.id)))
            }
        }
    }

    fn save(&self, forum: &Forum) -> StoreResult<()> {
        let record = ForumRecord {
            name: forum.name.clone(),
            description: forum.description.clone(),
        };
        self.mutate(|arena| arena.update(forum.id, record))
    }

    fn remove(&self, forum: &Forum) -> StoreResult<()> {
        self.mutate(|arena| arena.remove(forum.id).map(|_| ()))
    }
}
