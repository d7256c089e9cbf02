use thiserror::Error;

use crate::store::StoreError;

/// Failure kinds of the event operations. Mapping to a client-visible status
/// happens in the transport layer.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("{0}")]
    Validation(String),

    /// Covers both a missing record and one owned by someone else.
    #[error("event not found")]
    NotFound,

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl EventError {
    pub fn validation(message: impl Into<String>) -> Self {
        EventError::Validation(message.into())
    }
}
