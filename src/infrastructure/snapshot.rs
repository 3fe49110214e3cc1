//! TOML snapshot format for file-backed tree stores

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ForumArena, ForumId, ForumRecord, TreeId};
use crate::infrastructure::error::{StoreError, StoreResult};

/// On-disk image of a forum forest.
///
/// Forums are stored tree by tree (ascending tree id), each tree in
/// pre-order, so replaying them as "append last" rebuilds sibling order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Next id to allocate; keeps ids of deleted forums from being reused
    pub next_id: u64,
    #[serde(default)]
    pub forums: Vec<SnapshotForum>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotForum {
    pub id: ForumId,
    pub tree_id: TreeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ForumId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Snapshot {
    pub fn capture(arena: &ForumArena) -> Self {
        let forums = arena
            .tree_ids()
            .flat_map(|tree| arena.traverse(tree))
            .map(|forum| SnapshotForum {
                id: forum.id,
                tree_id: forum.tree_id,
                parent_id: forum.parent_id,
                name: forum.name,
                description: forum.description,
            })
            .collect();
        Self {
            next_id: arena.next_id(),
            forums,
        }
    }

    /// Rebuild the arena. `path` only labels errors.
    pub fn restore(self, path: &Path) -> StoreResult<ForumArena> {
        let mut arena = ForumArena::new();
        for forum in self.forums {
            let record = ForumRecord {
                name: forum.name,
                description: forum.description,
            };
            arena
                .insert_with_id(forum.id, forum.tree_id, forum.parent_id, record)
                .map_err(|e| StoreError::Format {
                    path: path.to_path_buf(),
                    message: format!("forum {}: {}", forum.id, e),
                })?;
        }
        arena.reserve_ids(self.next_id);
        Ok(arena)
    }
}

/// Load a snapshot file into an arena.
pub fn load(path: &Path) -> StoreResult<ForumArena> {
    debug!("load snapshot: {}", path.display());
    let content = std::fs::read_to_string(path)
        .map_err(|e| StoreError::io(format!("read {}", path.display()), e))?;
    let snapshot: Snapshot = toml::from_str(&content).map_err(|e| StoreError::Format {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    snapshot.restore(path)
}

/// Write a snapshot file, replacing any previous one in a single rename.
pub fn write(path: &Path, snapshot: &Snapshot) -> StoreResult<()> {
    debug!(
        "write snapshot: {} ({} forums)",
        path.display(),
        snapshot.forums.len()
    );
    let content = toml::to_string_pretty(snapshot).map_err(|e| StoreError::Format {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::io(format!("create {}", parent.display()), e))?;
        }
    }
    let staging = path.with_extension("toml.tmp");
    std::fs::write(&staging, content)
        .map_err(|e| StoreError::io(format!("write {}", staging.display()), e))?;
    std::fs::rename(&staging, path).map_err(|e| {
        if let Err(cleanup) = std::fs::remove_file(&staging) {
            debug!("remove {}: {}", staging.display(), cleanup);
        }
        StoreError::io(format!("rename {}", staging.display()), e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(name: &str) -> ForumRecord {
        ForumRecord {
            name: name.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn given_arena_when_capturing_then_lists_trees_in_preorder() {
        let mut arena = ForumArena::new();
        let general = arena.insert(TreeId(1), None, record("General")).unwrap();
        arena.insert(TreeId(2), None, record("Private")).unwrap();
        arena
            .insert(TreeId(1), Some(general.id), record("News"))
            .unwrap();

        let snapshot = Snapshot::capture(&arena);

        let names: Vec<&str> = snapshot.forums.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["General", "News", "Private"]);
        assert_eq!(snapshot.forums[1].parent_id, Some(general.id));
        assert_eq!(snapshot.next_id, 4);
    }

    #[test]
    fn given_toml_when_parsing_then_restores_hierarchy() {
        let content = r#"
next_id = 10

[[forums]]
id = 1
tree_id = 1
name = "General"

[[forums]]
id = 3
tree_id = 1
parent_id = 1
name = "News"
description = "Project news"
"#;
        let snapshot: Snapshot = toml::from_str(content).unwrap();

        let arena = snapshot.restore(&PathBuf::from("forums.toml")).unwrap();

        let news = arena.get(ForumId(3)).unwrap();
        assert_eq!(news.level, 2);
        assert_eq!(news.description, "Project news");
        assert_eq!(arena.next_id(), 10);
    }

    #[test]
    fn given_directory_at_target_when_writing_then_io_error_and_no_staging_left() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("forums.toml");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let result = write(&path, &Snapshot::capture(&ForumArena::new()));

        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn given_child_before_parent_when_restoring_then_format_error() {
        let snapshot = Snapshot {
            next_id: 3,
            forums: vec![
                SnapshotForum {
                    id: ForumId(2),
                    tree_id: TreeId(1),
                    parent_id: Some(ForumId(1)),
                    name: "Child".to_string(),
                    description: String::new(),
                },
                SnapshotForum {
                    id: ForumId(1),
                    tree_id: TreeId(1),
                    parent_id: None,
                    name: "Parent".to_string(),
                    description: String::new(),
                },
            ],
        };

        let result = snapshot.restore(&PathBuf::from("forums.toml"));

        assert!(matches!(result, Err(StoreError::Format { .. })));
    }
}
