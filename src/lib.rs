//! forumtree: administration of a forum hierarchy
//!
//! Forums form an ordered forest. The admin service lists the designated
//! tree in pre-order, reorders siblings and creates, edits or deletes
//! forums, persisting every change through a [`infrastructure::traits::TreeStore`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
