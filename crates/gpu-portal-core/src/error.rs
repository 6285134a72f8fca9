//! Error types for gpu-portal-core.

use crate::history::RequestStatus;
use crate::request::ValidationError;
use thiserror::Error;

/// Result type for gpu-portal-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gpu-portal-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A request form failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Free-form input rejected outside the request form (e.g. profile edits).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A request id that is not part of the history.
    #[error("Request '{0}' not found")]
    NotFound(String),

    /// A status change the request lifecycle does not allow.
    #[error("Cannot {action} request '{id}' while it is {status}")]
    InvalidTransition {
        /// Request id.
        id: String,
        /// Attempted action.
        action: &'static str,
        /// Status the request was in.
        status: RequestStatus,
    },

    /// A workflow step invoked out of order.
    #[error("Workflow error: {0}")]
    Workflow(String),

    /// The session storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored record could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
