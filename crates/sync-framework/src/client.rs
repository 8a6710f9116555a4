//! # Generic Client
//!
//! This module defines the generic client for communicating with stores.

use crate::collection::StoreSnapshot;
use crate::entity::SyncEntity;
use crate::error::SyncError;
use crate::message::StoreRequest;
use tokio::sync::{mpsc, oneshot};

/// ## StoreClient
///
/// The `StoreClient<T>` is the type-safe, async interface to a `StoreActor<T>`. It forwards
/// requests over a Tokio mpsc channel and awaits each answer on a oneshot channel. It holds
/// only a sender, so it is cheap to clone and share across tasks.
///
/// Every call resolves independently: two calls issued back to back may complete in either
/// order unless they target the same identifier.
pub struct StoreClient<T: SyncEntity> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: SyncEntity> Clone for StoreClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: SyncEntity> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn create(&self, params: T::Create) -> Result<T, SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Create { params, respond_to })
            .await
            .map_err(|_| SyncError::StoreClosed)?;
        response.await.map_err(|_| SyncError::StoreDropped)?
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Update {
                id,
                update,
                respond_to,
            })
            .await
            .map_err(|_| SyncError::StoreClosed)?;
        response.await.map_err(|_| SyncError::StoreDropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Delete { id, respond_to })
            .await
            .map_err(|_| SyncError::StoreClosed)?;
        response.await.map_err(|_| SyncError::StoreDropped)?
    }

    pub async fn perform(&self, id: T::Id, action: T::Action) -> Result<T, SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Action {
                id,
                action,
                respond_to,
            })
            .await
            .map_err(|_| SyncError::StoreClosed)?;
        response.await.map_err(|_| SyncError::StoreDropped)?
    }

    /// Replaces the local collection with the remote snapshot.
    pub async fn refresh(&self) -> Result<Vec<T>, SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Refresh { respond_to })
            .await
            .map_err(|_| SyncError::StoreClosed)?;
        response.await.map_err(|_| SyncError::StoreDropped)?
    }

    /// Current local collection, including any optimistic changes still in flight.
    pub async fn snapshot(&self) -> Result<StoreSnapshot<T>, SyncError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Snapshot { respond_to })
            .await
            .map_err(|_| SyncError::StoreClosed)?;
        response.await.map_err(|_| SyncError::StoreDropped)
    }
}
