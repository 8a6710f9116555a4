//! # Sync Framework
//!
//! This crate keeps a local, ordered copy of a remote collection consistent with the remote
//! authority while mutations are applied **optimistically**. It is built on the **Actor
//! Model**: one task owns the collection, and everything else talks to it through messages.
//!
//! ## Why an actor?
//!
//! Optimistic mutation means three moments for every operation: apply the change locally,
//! call the remote side, then reconcile or roll back. Calls for different entities overlap
//! and finish in any order. If several tasks touched the collection directly, each of those
//! moments would need a lock and rollback would have to reason about interleavings.
//!
//! Instead:
//! - The **actor** ([`StoreActor`]) owns the collection and applies every change on its own task.
//! - Remote calls run in spawned tasks and report back as **settlement** messages.
//! - **Snapshots** taken at the start of an operation travel with the settlement, so a
//!   rollback restores exactly what was there, at exactly the same index.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`SyncEntity`]) - identifiers, payload types, pure speculative updates
//! 2. **Runtime Layer** ([`StoreActor`], [`Collection`]) - optimistic apply, queueing,
//!    reconciliation
//! 3. **Interface Layer** ([`StoreClient`], [`SyncClient`]) - type-safe requests
//! 4. **Collaborator Layer** ([`Remote`]) - the system of record, injected at `run()`
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sync_framework::mock::MockRemote;
//! use sync_framework::{RemoteError, StoreActor, SyncEntity, SyncError};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Ticket { id: u32, title: String }
//!
//! impl SyncEntity for Ticket {
//!     type Id = u32;
//!     type Create = String;
//!     type Update = String;
//!     type Action = ();
//!     fn id(&self) -> &u32 { &self.id }
//!     fn merge(&self, title: &String) -> Self { Ticket { id: self.id, title: title.clone() } }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let remote = MockRemote::<Ticket>::new();
//!     remote.expect_fetch_all().return_ok(vec![Ticket { id: 1, title: "old".into() }]);
//!     remote.expect_update(1).return_err(RemoteError::new("conflict"));
//!
//!     let (actor, client) = StoreActor::<Ticket>::new(10);
//!     tokio::spawn(actor.run(Arc::new(remote.clone())));
//!
//!     client.refresh().await.unwrap();
//!     let result = client.update(1, "new".into()).await;
//!     assert!(matches!(result, Err(SyncError::RemoteRejected(_))));
//!
//!     // The speculative title was rolled back
//!     let snapshot = client.snapshot().await.unwrap();
//!     assert_eq!(snapshot.items[0].title, "old");
//!     assert_eq!(snapshot.revision, 1);
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each store runs in its own Tokio task and processes messages **sequentially**.
//! - Remote calls for different identifiers are in flight **concurrently**.
//! - Calls for the same identifier are **queued** until the previous one settles.
//! - No remote call is cancelled or timed out by the store; callers that need a deadline
//!   wrap the client call in `tokio::time::timeout`.
//!
//! ## Testing
//!
//! See the [`mock`] module for a scripted remote and a hand-answered remote for race tests.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod collection;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod remote;
pub mod tracing;

// Re-export core types for convenience
pub use actor::StoreActor;
pub use client::StoreClient;
pub use client_trait::SyncClient;
pub use collection::{Collection, Snapshot, StoreSnapshot};
pub use entity::SyncEntity;
pub use error::{RemoteError, SyncError};
pub use message::{Response, Settlement, StoreRequest};
pub use remote::Remote;
