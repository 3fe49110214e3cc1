//! Service container for dependency injection
//!
//! Wires up the admin service with its collaborators.

use std::sync::Arc;

use crate::application::services::ForumAdminService;
use crate::config::Settings;
use crate::infrastructure::error::StoreResult;
use crate::infrastructure::store::FileTreeStore;
use crate::infrastructure::traits::{CacheBuster, SessionMessages, TreeStore};

/// Container holding all application services and their collaborators.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Forum tree storage
    pub store: Arc<dyn TreeStore>,

    /// Success messages of the current session
    pub messages: Arc<SessionMessages>,

    /// ACL cache version marker
    pub cache: Arc<CacheBuster>,
}

impl ServiceContainer {
    /// Create a container backed by the snapshot file from `settings`.
    pub fn new(settings: Settings) -> StoreResult<Self> {
        let store = FileTreeStore::open(settings.store_path.clone())?;
        Ok(Self::with_store(settings, Arc::new(store)))
    }

    /// Create a container with a custom store (for testing).
    pub fn with_store(settings: Settings, store: Arc<dyn TreeStore>) -> Self {
        Self {
            settings: Arc::new(settings),
            store,
            messages: Arc::new(SessionMessages::new()),
            cache: Arc::new(CacheBuster::new()),
        }
    }

    pub fn forum_admin(&self) -> ForumAdminService {
        ForumAdminService::new(
            self.store.clone(),
            self.messages.clone(),
            self.cache.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewForum;
    use crate::infrastructure::store::MemoryTreeStore;

    #[test]
    fn given_container_when_creating_forum_then_notice_and_cache_shared() {
        let container =
            ServiceContainer::with_store(Settings::default(), Arc::new(MemoryTreeStore::new()));
        let version = container.cache.version();

        container
            .forum_admin()
            .create(NewForum {
                name: "General".to_string(),
                description: String::new(),
                parent: None,
            })
            .unwrap();

        assert_eq!(
            container.messages.drain(),
            vec!["New forum \"General\" has been saved.".to_string()]
        );
        assert!(!container.cache.is_valid(version));
    }
}
