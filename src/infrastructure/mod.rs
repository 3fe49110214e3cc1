//! Infrastructure layer: tree stores, boundary traits and DI container
//!
//! This layer implements the boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod snapshot;
pub mod store;
pub mod traits;

pub use error::{InfraError, StoreError, StoreResult};
pub use store::{FileTreeStore, MemoryTreeStore};
