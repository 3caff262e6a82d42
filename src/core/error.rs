//! Error types and handling for the content service
//!
//! This module defines the error taxonomy shared by the repository, the
//! storage backends and the HTTP layer. Backend-native errors are translated
//! into [`StoreError`] at the adapter boundary and never leak further.

use thiserror::Error;

use crate::forms::ValidationErrors;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Result type used by storage backends
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Main error type for the content service
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage layer errors
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Submission failed field validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// No valid admin session for a protected operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Disk I/O operation failed
    #[error("disk I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A document with this id already exists in the collection
    #[error("document already exists: {0}")]
    Conflict(String),

    /// Collection name rejected by the backend
    #[error("invalid collection name: {0}")]
    InvalidCollection(String),

    /// Any other backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short machine-stable reason string carried by every API error
    pub fn reason(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::Storage(StoreError::Unavailable(_)) => "store_unavailable",
            Error::Storage(StoreError::InvalidCollection(_)) => "invalid_input",
            Error::Storage(StoreError::Conflict(_)) => "conflict",
            Error::Storage(_) => "storage_error",
            Error::Validation(_) => "validation_failed",
            Error::Unauthorized(_) => "unauthorized",
            Error::NotFound(_) => "not_found",
            Error::InvalidInput(_) => "invalid_input",
            Error::Internal(_) | Error::Io(_) => "internal",
        }
    }

    /// Check if this is a client error (4xx equivalent)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::Unauthorized(_)
                | Error::NotFound(_)
                | Error::InvalidInput(_)
                | Error::Storage(StoreError::InvalidCollection(_))
                | Error::Storage(StoreError::Conflict(_))
        )
    }

    /// Check if this is a server error (5xx equivalent)
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }
}

impl StoreError {
    /// Whether the failure means the store could not be reached at all
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
