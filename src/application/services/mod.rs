//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on boundary traits (TreeStore, Notifier, CacheInvalidator)
//! but are themselves concrete structs, not traits.

mod forum_admin;

pub use forum_admin::{ForumAdminService, MAX_NAME_LENGTH};
