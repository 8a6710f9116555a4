//! Error types for the Product store.

use crate::upload::UploadError;
use sync_framework::SyncError;
use thiserror::Error;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    /// The requested product is not in the local collection.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The draft could not be encoded for upload.
    #[error("Product validation error: {0}")]
    ValidationError(String),

    /// The backend refused the change or could not be reached.
    #[error("Product rejected by backend: {0}")]
    RemoteRejected(String),

    /// An error occurred while communicating with the store.
    #[error("Store communication error: {0}")]
    StoreCommunicationError(String),
}

impl From<String> for ProductError {
    fn from(msg: String) -> Self {
        ProductError::StoreCommunicationError(msg)
    }
}

impl From<UploadError> for ProductError {
    fn from(e: UploadError) -> Self {
        ProductError::ValidationError(e.to_string())
    }
}

impl From<SyncError> for ProductError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::Validation(msg) => ProductError::ValidationError(msg),
            SyncError::RemoteRejected(msg) => ProductError::RemoteRejected(msg),
            SyncError::NotFound(id) => ProductError::NotFound(id),
            other => ProductError::StoreCommunicationError(other.to_string()),
        }
    }
}
