//! Forum administration service
//!
//! Listing, target resolution, sibling reordering and forum mutations,
//! all scoped to the designated tree.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    annotate, Direction, Forum, ForumChanges, ForumId, ForumRecord, ForumRow, NewForum, Position,
    ReorderOutcome, DESIGNATED_TREE,
};
use crate::infrastructure::traits::{CacheInvalidator, Notifier, TreeStore};

/// Maximum length for a forum name in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Service for administering the forum hierarchy.
pub struct ForumAdminService {
    store: Arc<dyn TreeStore>,
    notifier: Arc<dyn Notifier>,
    cache: Arc<dyn CacheInvalidator>,
}

impl ForumAdminService {
    /// Create a new forum admin service.
    pub fn new(
        store: Arc<dyn TreeStore>,
        notifier: Arc<dyn Notifier>,
        cache: Arc<dyn CacheInvalidator>,
    ) -> Self {
        Self {
            store,
            notifier,
            cache,
        }
    }

    /// Fetch a forum of the designated tree.
    ///
    /// Forums of other trees fail exactly like missing ones.
    pub fn resolve(&self, id: ForumId) -> ApplicationResult<Forum> {
        match self.store.get(id)? {
            Some(forum) if forum.tree_id == DESIGNATED_TREE => Ok(forum),
            Some(forum) => {
                debug!("resolve: forum {} lives in tree {}", id, forum.tree_id);
                Err(ApplicationError::ForumNotFound(id))
            }
            None => Err(ApplicationError::ForumNotFound(id)),
        }
    }

    /// Forums of the designated tree in pre-order.
    pub fn forums(&self) -> ApplicationResult<Vec<Forum>> {
        Ok(self.store.all_in_traversal_order(DESIGNATED_TREE)?)
    }

    /// Forums of the designated tree annotated for display.
    pub fn list(&self) -> ApplicationResult<Vec<ForumRow>> {
        let forums = self.forums()?;
        debug!("list: {} forums", forums.len());
        Ok(annotate(forums))
    }

    /// Swap `target` with its adjacent sibling in `direction`.
    ///
    /// Without such a sibling nothing is touched and `Unchanged` is returned.
    /// Emits no notice and leaves the ACL cache alone.
    pub fn reorder(
        &self,
        direction: Direction,
        target: &Forum,
    ) -> ApplicationResult<ReorderOutcome> {
        let sibling = match direction {
            Direction::Up => self.store.previous_sibling(target)?,
            Direction::Down => self.store.next_sibling(target)?,
        };

        match sibling {
            Some(sibling) => {
                self.store.relocate(target, &sibling, direction.side())?;
                info!("moved forum {} {} past {}", target, direction, sibling);
                Ok(ReorderOutcome::Moved { sibling })
            }
            None => {
                debug!("reorder: forum {} has no sibling {}", target, direction);
                Ok(ReorderOutcome::Unchanged)
            }
        }
    }

    pub fn move_up(&self, id: ForumId) -> ApplicationResult<ReorderOutcome> {
        self.move_forum(Direction::Up, id)
    }

    pub fn move_down(&self, id: ForumId) -> ApplicationResult<ReorderOutcome> {
        self.move_forum(Direction::Down, id)
    }

    fn move_forum(&self, direction: Direction, id: ForumId) -> ApplicationResult<ReorderOutcome> {
        let target = self.resolve(id)?;
        let outcome = self.reorder(direction, &target)?;
        if outcome.is_moved() {
            self.notifier.success(&format!(
                "Forum \"{}\" has been moved {}.",
                target.name, direction
            ));
        }
        Ok(outcome)
    }

    /// Create a forum as the last child of its parent
    /// (or the last top-level forum).
    pub fn create(&self, new: NewForum) -> ApplicationResult<Forum> {
        debug!("create: name={:?} parent={:?}", new.name, new.parent);
        let name = validate_name(&new.name)?;
        let parent = new.parent.map(|id| self.resolve(id)).transpose()?;

        let record = ForumRecord {
            name,
            description: new.description.trim().to_string(),
        };
        let forum = self.store.insert(
            DESIGNATED_TREE,
            record,
            parent.as_ref(),
            Position::LastChild,
        )?;
        info!("created forum {}", forum);

        self.cache.invalidate();
        self.notifier
            .success(&format!("New forum \"{}\" has been saved.", forum.name));
        Ok(forum)
    }

    /// Apply `changes` to a forum, moving it to the end of a new parent's
    /// children when the parent changes.
    pub fn edit(&self, id: ForumId, changes: ForumChanges) -> ApplicationResult<Forum> {
        debug!("edit: id={} changes={:?}", id, changes);
        let mut forum = self.resolve(id)?;
        let name = changes.name.as_deref().map(validate_name).transpose()?;

        let mut moved = false;
        if let Some(choice) = changes.new_parent {
            if choice.id() != forum.parent_id {
                let parent = choice.id().map(|pid| self.resolve(pid)).transpose()?;
                self.store
                    .move_node(&forum, parent.as_ref(), Position::LastChild)?;
                info!("moved forum {} under {:?}", forum, choice);
                moved = true;
            }
        }

        if let Some(name) = name {
            forum.name = name;
        }
        if let Some(description) = changes.description {
            forum.description = description.trim().to_string();
        }
        if let Err(e) = self.store.save(&forum) {
            // the tree already changed shape
            if moved {
                self.cache.invalidate();
            }
            return Err(e.into());
        }
        let forum = self.resolve(id)?;

        self.cache.invalidate();
        self.notifier
            .success(&format!("Forum \"{}\" has been edited.", forum.name));
        Ok(forum)
    }

    /// Delete a forum without children.
    pub fn delete(&self, id: ForumId) -> ApplicationResult<Forum> {
        debug!("delete: id={}", id);
        let forum = self.resolve(id)?;
        self.store.remove(&forum)?;
        info!("deleted forum {}", forum);

        self.cache.invalidate();
        self.notifier
            .success(&format!("Forum \"{}\" has been deleted.", forum.name));
        Ok(forum)
    }
}

fn validate_name(name: &str) -> ApplicationResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApplicationError::InvalidInput {
            message: "forum name cannot be empty".to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ApplicationError::InvalidInput {
            message: format!("forum name exceeds {} characters", MAX_NAME_LENGTH),
        });
    }
    Ok(name.to_string())
}
