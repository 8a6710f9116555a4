//! # Store Messages
//!
//! Message types exchanged between [`StoreClient`](crate::StoreClient) and
//! [`StoreActor`](crate::StoreActor).
//!
//! Two channels feed the actor:
//! - **Requests** ([`StoreRequest`]) come from clients.
//! - **Settlements** ([`Settlement`]) come from the spawned tasks that carry out remote calls.
//!   Each one holds the snapshot taken when the request started, so the actor can reconcile
//!   or roll back without having kept any per-request state of its own.

use crate::collection::{Snapshot, StoreSnapshot};
use crate::entity::SyncEntity;
use crate::error::{RemoteError, SyncError};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by stores.
pub type Response<T> = oneshot::Sender<Result<T, SyncError>>;

/// Request sent to the store.
///
/// `Create`, `Refresh` and `Snapshot` are not tied to an identifier. `Update`, `Delete` and
/// `Action` are, and the store runs at most one of them per identifier at a time.
#[derive(Debug)]
pub enum StoreRequest<T: SyncEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T>,
    },
    Refresh {
        respond_to: Response<Vec<T>>,
    },
    Snapshot {
        respond_to: oneshot::Sender<StoreSnapshot<T>>,
    },
}

impl<T: SyncEntity> StoreRequest<T> {
    /// The identifier this request is serialized on, if any.
    pub fn key(&self) -> Option<&T::Id> {
        match self {
            StoreRequest::Update { id, .. }
            | StoreRequest::Delete { id, .. }
            | StoreRequest::Action { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StoreRequest::Create { .. } => "Create",
            StoreRequest::Update { .. } => "Update",
            StoreRequest::Delete { .. } => "Delete",
            StoreRequest::Action { .. } => "Action",
            StoreRequest::Refresh { .. } => "Refresh",
            StoreRequest::Snapshot { .. } => "Snapshot",
        }
    }
}

/// Outcome of a remote call, routed back to the actor.
#[derive(Debug)]
pub enum Settlement<T: SyncEntity> {
    Created {
        result: Result<T, RemoteError>,
        respond_to: Response<T>,
    },
    Updated {
        id: T::Id,
        snapshot: Snapshot<T>,
        result: Result<T, RemoteError>,
        respond_to: Response<T>,
    },
    Deleted {
        id: T::Id,
        snapshot: Snapshot<T>,
        result: Result<(), RemoteError>,
        respond_to: Response<()>,
    },
    Acted {
        id: T::Id,
        snapshot: Snapshot<T>,
        applied: T,
        result: Result<(), RemoteError>,
        respond_to: Response<T>,
    },
    Refreshed {
        result: Result<Vec<T>, RemoteError>,
        respond_to: Response<Vec<T>>,
    },
}

impl<T: SyncEntity> Settlement<T> {
    /// The identifier whose queue advances once this settlement is applied.
    pub fn key(&self) -> Option<&T::Id> {
        match self {
            Settlement::Updated { id, .. }
            | Settlement::Deleted { id, .. }
            | Settlement::Acted { id, .. } => Some(id),
            _ => None,
        }
    }
}
