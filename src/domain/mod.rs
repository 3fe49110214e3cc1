//! Domain layer: entities and tree logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod presentation;

pub use arena::{DomainResult, ForumArena, ForumNode};
pub use entities::*;
pub use error::DomainError;
pub use presentation::{annotate, to_tree, ForumRow};
