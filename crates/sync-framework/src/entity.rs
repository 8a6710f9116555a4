//! # SyncEntity Trait
//!
//! The `SyncEntity` trait defines the contract every resource kind (Product, Order, …) must
//! implement to be held by the generic [`StoreActor`](crate::StoreActor). It names the
//! associated payload types and the two pure functions the store needs to act optimistically:
//! computing the speculative value of an update and of a custom action.
//!
//! # Architecture Note
//! The store never inspects the fields of an entity. Everything it knows comes from this
//! trait: how to find an entity's identifier, how a patch changes it, and how an action
//! changes it. That is what lets one snapshot/rollback implementation serve every
//! resource kind.
//!
//! Associated types keep payloads apart at compile time: a `Product` update carries a
//! `ProductPatch`, and there is no way to hand it to the order store.
//!
//! # Provided Methods
//! - [`SyncEntity::merge`] defaults to "no local change" for kinds without updates.
//! - [`SyncEntity::apply`] defaults to [`SyncError::Unsupported`] for kinds without actions.

use crate::error::SyncError;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by a `StoreActor`.
pub trait SyncEntity: Clone + Debug + Send + Sync + 'static {
    /// Server-assigned identifier.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// Payload handed to the remote side to create a new instance.
    type Create: Send + Sync + Debug + 'static;

    /// Patch applied to an existing instance.
    type Update: Send + Sync + Debug + 'static;

    /// Resource-specific operation (e.g. a status change).
    type Action: Clone + Send + Sync + Debug + 'static;

    /// The identifier of this instance.
    fn id(&self) -> &Self::Id;

    /// Returns the speculative value shown while an update is in flight.
    ///
    /// Must not mutate `self`; the store keeps `self` as the rollback snapshot.
    fn merge(&self, _update: &Self::Update) -> Self {
        self.clone()
    }

    /// Returns the value after applying `action`, or why the action is not allowed.
    ///
    /// Errors here are raised before the remote call is attempted.
    fn apply(&self, _action: &Self::Action) -> Result<Self, SyncError> {
        Err(SyncError::Unsupported("action"))
    }
}
