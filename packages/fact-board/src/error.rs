//! Typed errors for the fact board.
//!
//! Service failures keep their cause; the board-level error is what a user
//! sees, so its `Display` is the message the UI shows for that operation.

use thiserror::Error;

use crate::types::FactId;

/// Message shown when the fact list cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str =
    "There was a problem loading fetching data from the database.";

/// Message shown when a vote or a submission fails.
pub const ACTION_FAILED_MESSAGE: &str = "Something went wrong.";

/// Errors returned by a data service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No fact with this id exists
    #[error("fact not found: {0}")]
    NotFound(FactId),

    /// The service returned no record where one was expected
    #[error("empty response from {operation}")]
    EmptyResponse { operation: &'static str },

    /// Response body could not be decoded
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Service could not be reached
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// A category name that is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown category: {0}")]
    NotFound(String),
}

/// Errors surfaced by board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Fetching the fact list failed
    #[error("{}", LOAD_FAILED_MESSAGE)]
    Load(#[source] ServiceError),

    /// Recording a vote failed
    #[error("{}", ACTION_FAILED_MESSAGE)]
    Vote(#[source] ServiceError),

    /// Persisting a new fact failed
    #[error("{}", ACTION_FAILED_MESSAGE)]
    Submit(#[source] ServiceError),

    /// A filter was requested for a category that does not exist
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Result type alias for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Result type alias for data service calls.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
