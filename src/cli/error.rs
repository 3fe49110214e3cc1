//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::{InfraError, StoreError};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Infra(InfraError::Application(ApplicationError::Store(e)))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::ForumNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::InvalidInput { .. } => crate::exitcode::DATAERR,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Store(StoreError::Io { .. }) => crate::exitcode::IOERR,
                    ApplicationError::Store(StoreError::Format { .. }) => crate::exitcode::DATAERR,
                    ApplicationError::Store(_) => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, ForumId};

    #[test]
    fn given_not_found_when_mapping_exit_code_then_noinput() {
        let err = CliError::from(ApplicationError::ForumNotFound(ForumId(3)));
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
        assert_eq!(err.to_string(), "Requested forum does not exist.");
    }

    #[test]
    fn given_terminal_write_failure_when_mapping_exit_code_then_ioerr() {
        let source = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err = CliError::from(InfraError::io("print help", source));
        assert_eq!(err.exit_code(), crate::exitcode::IOERR);
        assert_eq!(err.to_string(), "I/O error: print help");
    }

    #[test]
    fn given_rejected_tree_change_when_mapping_exit_code_then_software() {
        let err = CliError::from(StoreError::Domain(DomainError::HasChildren(ForumId(1))));
        assert_eq!(err.exit_code(), crate::exitcode::SOFTWARE);
    }
}
