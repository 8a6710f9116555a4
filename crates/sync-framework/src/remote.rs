//! # Remote Collaborator
//!
//! The system of record lives behind this trait. The store only ever talks to the remote
//! side through it, so tests swap in [`MockRemote`](crate::mock::MockRemote) and production
//! code wires in an HTTP adapter.

use crate::entity::SyncEntity;
use crate::error::RemoteError;
use async_trait::async_trait;

/// Remote operations for one resource kind.
///
/// Only `fetch_all` is required. Kinds that do not support an operation keep the
/// provided default, which rejects the call.
#[async_trait]
pub trait Remote<T: SyncEntity>: Send + Sync + 'static {
    /// Full snapshot of the collection, in display order.
    async fn fetch_all(&self) -> Result<Vec<T>, RemoteError>;

    /// Creates an instance; the server assigns its identifier.
    async fn create(&self, _params: T::Create) -> Result<T, RemoteError> {
        Err(RemoteError::unsupported("create"))
    }

    /// Updates an instance and returns the server's canonical value.
    async fn update(&self, _id: T::Id, _update: T::Update) -> Result<T, RemoteError> {
        Err(RemoteError::unsupported("update"))
    }

    async fn delete(&self, _id: T::Id) -> Result<(), RemoteError> {
        Err(RemoteError::unsupported("delete"))
    }

    /// Performs a custom action.
    async fn perform(&self, _id: T::Id, _action: T::Action) -> Result<(), RemoteError> {
        Err(RemoteError::unsupported("action"))
    }
}
