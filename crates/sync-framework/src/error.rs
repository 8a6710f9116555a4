//! # Framework Errors
//!
//! Common error types shared by every store and client. Resource-specific
//! clients map these into their own error enums at the boundary.

/// Errors produced by the store runtime and by remote collaborators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    /// Malformed caller input, detected before any remote call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote side refused the operation, or the transport failed.
    #[error("Remote rejected: {0}")]
    RemoteRejected(String),

    /// The targeted identifier is not present in the local collection.
    #[error("Item not found: {0}")]
    NotFound(String),

    /// The resource kind does not support this operation.
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("Store closed")]
    StoreClosed,

    #[error("Store dropped response channel")]
    StoreDropped,
}

/// Failure reported by a [`Remote`](crate::Remote) implementation.
///
/// Carries the human-readable message the remote side returned so callers
/// can surface it unmodified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn unsupported(operation: &str) -> Self {
        Self::new(format!("{operation} is not supported by this resource"))
    }
}

impl From<RemoteError> for SyncError {
    fn from(e: RemoteError) -> Self {
        SyncError::RemoteRejected(e.message)
    }
}
