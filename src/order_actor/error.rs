//! Error types for the Order store.

use crate::model::OrderStatus;
use sync_framework::SyncError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order is not in the local collection.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The status machine refused the change.
    #[error("Order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Malformed caller input.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// The backend refused the change or could not be reached.
    #[error("Order rejected by backend: {0}")]
    RemoteRejected(String),

    /// An error occurred while communicating with the store.
    #[error("Store communication error: {0}")]
    StoreCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::StoreCommunicationError(msg)
    }
}

impl From<SyncError> for OrderError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::Validation(msg) => OrderError::ValidationError(msg),
            SyncError::RemoteRejected(msg) => OrderError::RemoteRejected(msg),
            SyncError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::StoreCommunicationError(other.to_string()),
        }
    }
}
