//! Application-level errors (wraps domain and store errors)

use thiserror::Error;

use crate::domain::ForumId;
use crate::infrastructure::StoreError;

/// Application errors wrap store errors and add admin-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// Target missing, or outside the designated tree
    #[error("Requested forum does not exist.")]
    ForumNotFound(ForumId),

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApplicationError::ForumNotFound(_))
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
