//! # Mock Remotes & Testing Guide
//!
//! The store only reaches the system of record through [`Remote`]. This module provides two
//! stand-ins for it, so store behaviour can be tested without a network.
//!
//! ## When to use which
//!
//! | Feature | MockRemote | Channel remote |
//! |---------|------------|----------------|
//! | **Setup** | Fluent expectations | Answer each call by hand |
//! | **Completion order** | As soon as the call is made | Whatever order the test responds in |
//! | **Use Case** | Success/rejection paths | Races, late responses, in-flight state |
//!
//! ## Pattern 1: Scripted remote
//!
//! ```rust
//! use std::sync::Arc;
//! use sync_framework::mock::MockRemote;
//! use sync_framework::{RemoteError, StoreActor, SyncEntity, SyncError};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Note { id: String }
//!
//! impl SyncEntity for Note {
//!     type Id = String;
//!     type Create = ();
//!     type Update = ();
//!     type Action = ();
//!     fn id(&self) -> &String { &self.id }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let remote = MockRemote::<Note>::new();
//!     remote.expect_fetch_all().return_ok(vec![Note { id: "a".into() }, Note { id: "b".into() }]);
//!     remote.expect_delete("b".to_string()).return_err(RemoteError::new("locked"));
//!
//!     let (actor, client) = StoreActor::<Note>::new(10);
//!     tokio::spawn(actor.run(Arc::new(remote.clone())));
//!
//!     client.refresh().await.unwrap();
//!     let result = client.delete("b".to_string()).await;
//!     assert_eq!(result, Err(SyncError::RemoteRejected("locked".into())));
//!
//!     // Rolled back in place
//!     let snapshot = client.snapshot().await.unwrap();
//!     let ids: Vec<_> = snapshot.items.into_iter().map(|n| n.id).collect();
//!     assert_eq!(ids, vec!["a", "b"]);
//!     remote.verify();
//! }
//! ```
//!
//! ## Pattern 2: Hand-answered remote
//!
//! [`create_mock_remote`] returns a remote plus the receiving end of every call it gets.
//! Each [`RemoteCall`] carries a responder; the call stays in flight until the test answers
//! it, which makes it possible to observe optimistic state and to settle calls out of order.
//! See `tests/integration_test.rs` for examples.

use crate::entity::SyncEntity;
use crate::error::RemoteError;
use crate::remote::Remote;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected remote call and the response it should get.
enum Expectation<T: SyncEntity> {
    FetchAll {
        response: Result<Vec<T>, RemoteError>,
    },
    Create {
        response: Result<T, RemoteError>,
    },
    Update {
        id: T::Id,
        response: Result<T, RemoteError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), RemoteError>,
    },
    Perform {
        id: T::Id,
        response: Result<(), RemoteError>,
    },
}

impl<T: SyncEntity> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::FetchAll { .. } => "fetch_all".to_string(),
            Expectation::Create { .. } => "create".to_string(),
            Expectation::Update { id, .. } => format!("update({id})"),
            Expectation::Delete { id, .. } => format!("delete({id})"),
            Expectation::Perform { id, .. } => format!("perform({id})"),
        }
    }
}

struct MockState<T: SyncEntity> {
    expectations: VecDeque<Expectation<T>>,
    unexpected: Vec<String>,
}

/// A scripted [`Remote`] with expectation tracking for fluent testing.
///
/// Calls are matched to the first expectation of the same kind (and identifier), not
/// strictly in registration order, because the store runs remote calls for different
/// entities concurrently. A call nothing was registered for is answered with a
/// [`RemoteError`] and reported by [`MockRemote::verify`].
pub struct MockRemote<T: SyncEntity> {
    state: Arc<Mutex<MockState<T>>>,
}

impl<T: SyncEntity> Clone for MockRemote<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: SyncEntity> Default for MockRemote<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SyncEntity> MockRemote<T> {
    /// Creates a new mock remote with no expectations.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                expectations: VecDeque::new(),
                unexpected: Vec::new(),
            })),
        }
    }

    pub fn expect_fetch_all(&self) -> FetchAllExpectationBuilder<T> {
        FetchAllExpectationBuilder {
            state: Arc::clone(&self.state),
        }
    }

    pub fn expect_create(&self) -> CreateExpectationBuilder<T> {
        CreateExpectationBuilder {
            state: Arc::clone(&self.state),
        }
    }

    pub fn expect_update(&self, id: T::Id) -> UpdateExpectationBuilder<T> {
        UpdateExpectationBuilder {
            id,
            state: Arc::clone(&self.state),
        }
    }

    pub fn expect_delete(&self, id: T::Id) -> UnitExpectationBuilder<T> {
        UnitExpectationBuilder {
            id,
            kind: UnitKind::Delete,
            state: Arc::clone(&self.state),
        }
    }

    pub fn expect_perform(&self, id: T::Id) -> UnitExpectationBuilder<T> {
        UnitExpectationBuilder {
            id,
            kind: UnitKind::Perform,
            state: Arc::clone(&self.state),
        }
    }

    /// Verifies that all expectations were met and no unexpected call arrived.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.unexpected.is_empty() {
            panic!("Unexpected remote calls: {:?}", state.unexpected);
        }
        if !state.expectations.is_empty() {
            let remaining: Vec<String> = state.expectations.iter().map(|e| e.describe()).collect();
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                remaining.len(),
                remaining
            );
        }
    }

    fn take<R>(
        &self,
        call: String,
        select: impl Fn(&Expectation<T>) -> bool,
        extract: impl FnOnce(Expectation<T>) -> Option<Result<R, RemoteError>>,
    ) -> Result<R, RemoteError> {
        let mut state = self.state.lock().unwrap();
        let found = state
            .expectations
            .iter()
            .position(select)
            .and_then(|index| state.expectations.remove(index))
            .and_then(extract);
        match found {
            Some(response) => response,
            None => {
                let message = format!("unexpected remote call: {call}");
                state.unexpected.push(call);
                Err(RemoteError::new(message))
            }
        }
    }
}

#[async_trait]
impl<T: SyncEntity> Remote<T> for MockRemote<T> {
    async fn fetch_all(&self) -> Result<Vec<T>, RemoteError> {
        self.take(
            "fetch_all".to_string(),
            |e| matches!(e, Expectation::FetchAll { .. }),
            |e| match e {
                Expectation::FetchAll { response } => Some(response),
                _ => None,
            },
        )
    }

    async fn create(&self, _params: T::Create) -> Result<T, RemoteError> {
        self.take(
            "create".to_string(),
            |e| matches!(e, Expectation::Create { .. }),
            |e| match e {
                Expectation::Create { response } => Some(response),
                _ => None,
            },
        )
    }

    async fn update(&self, id: T::Id, _update: T::Update) -> Result<T, RemoteError> {
        self.take(
            format!("update({id})"),
            |e| matches!(e, Expectation::Update { id: expected, .. } if *expected == id),
            |e| match e {
                Expectation::Update { response, .. } => Some(response),
                _ => None,
            },
        )
    }

    async fn delete(&self, id: T::Id) -> Result<(), RemoteError> {
        self.take(
            format!("delete({id})"),
            |e| matches!(e, Expectation::Delete { id: expected, .. } if *expected == id),
            |e| match e {
                Expectation::Delete { response, .. } => Some(response),
                _ => None,
            },
        )
    }

    async fn perform(&self, id: T::Id, _action: T::Action) -> Result<(), RemoteError> {
        self.take(
            format!("perform({id})"),
            |e| matches!(e, Expectation::Perform { id: expected, .. } if *expected == id),
            |e| match e {
                Expectation::Perform { response, .. } => Some(response),
                _ => None,
            },
        )
    }
}

/// Builder for `fetch_all` expectations.
pub struct FetchAllExpectationBuilder<T: SyncEntity> {
    state: Arc<Mutex<MockState<T>>>,
}

impl<T: SyncEntity> FetchAllExpectationBuilder<T> {
    pub fn return_ok(self, items: Vec<T>) {
        push(&self.state, Expectation::FetchAll { response: Ok(items) });
    }

    pub fn return_err(self, error: RemoteError) {
        push(&self.state, Expectation::FetchAll { response: Err(error) });
    }
}

/// Builder for `create` expectations.
pub struct CreateExpectationBuilder<T: SyncEntity> {
    state: Arc<Mutex<MockState<T>>>,
}

impl<T: SyncEntity> CreateExpectationBuilder<T> {
    pub fn return_ok(self, created: T) {
        push(&self.state, Expectation::Create { response: Ok(created) });
    }

    pub fn return_err(self, error: RemoteError) {
        push(&self.state, Expectation::Create { response: Err(error) });
    }
}

/// Builder for `update` expectations.
pub struct UpdateExpectationBuilder<T: SyncEntity> {
    id: T::Id,
    state: Arc<Mutex<MockState<T>>>,
}

impl<T: SyncEntity> UpdateExpectationBuilder<T> {
    /// The server accepts the update and answers with `canonical`.
    pub fn return_ok(self, canonical: T) {
        push(
            &self.state,
            Expectation::Update {
                id: self.id,
                response: Ok(canonical),
            },
        );
    }

    pub fn return_err(self, error: RemoteError) {
        push(
            &self.state,
            Expectation::Update {
                id: self.id,
                response: Err(error),
            },
        );
    }
}

enum UnitKind {
    Delete,
    Perform,
}

/// Builder for `delete` and `perform` expectations.
pub struct UnitExpectationBuilder<T: SyncEntity> {
    id: T::Id,
    kind: UnitKind,
    state: Arc<Mutex<MockState<T>>>,
}

impl<T: SyncEntity> UnitExpectationBuilder<T> {
    pub fn return_ok(self) {
        self.respond(Ok(()));
    }

    pub fn return_err(self, error: RemoteError) {
        self.respond(Err(error));
    }

    fn respond(self, response: Result<(), RemoteError>) {
        let expectation = match self.kind {
            UnitKind::Delete => Expectation::Delete {
                id: self.id,
                response,
            },
            UnitKind::Perform => Expectation::Perform {
                id: self.id,
                response,
            },
        };
        push(&self.state, expectation);
    }
}

fn push<T: SyncEntity>(state: &Arc<Mutex<MockState<T>>>, expectation: Expectation<T>) {
    state.lock().unwrap().expectations.push_back(expectation);
}

// =============================================================================
// HAND-ANSWERED REMOTE
// =============================================================================

/// Type alias for the responder carried by a [`RemoteCall`].
pub type Responder<R> = oneshot::Sender<Result<R, RemoteError>>;

/// A remote call captured by [`ChannelRemote`], waiting for the test to answer it.
#[derive(Debug)]
pub enum RemoteCall<T: SyncEntity> {
    FetchAll {
        respond_to: Responder<Vec<T>>,
    },
    Create {
        params: T::Create,
        respond_to: Responder<T>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Responder<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Responder<()>,
    },
    Perform {
        id: T::Id,
        action: T::Action,
        respond_to: Responder<()>,
    },
}

/// A [`Remote`] that forwards every call to a channel the test reads from.
pub struct ChannelRemote<T: SyncEntity> {
    sender: mpsc::Sender<RemoteCall<T>>,
}

impl<T: SyncEntity> ChannelRemote<T> {
    async fn call<R>(
        &self,
        build: impl FnOnce(Responder<R>) -> RemoteCall<T>,
    ) -> Result<R, RemoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| RemoteError::new("mock remote closed"))?;
        response
            .await
            .map_err(|_| RemoteError::new("mock remote dropped the call"))?
    }
}

#[async_trait]
impl<T: SyncEntity> Remote<T> for ChannelRemote<T> {
    async fn fetch_all(&self) -> Result<Vec<T>, RemoteError> {
        self.call(|respond_to| RemoteCall::FetchAll { respond_to })
            .await
    }

    async fn create(&self, params: T::Create) -> Result<T, RemoteError> {
        self.call(|respond_to| RemoteCall::Create { params, respond_to })
            .await
    }

    async fn update(&self, id: T::Id, update: T::Update) -> Result<T, RemoteError> {
        self.call(|respond_to| RemoteCall::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    async fn delete(&self, id: T::Id) -> Result<(), RemoteError> {
        self.call(|respond_to| RemoteCall::Delete { id, respond_to })
            .await
    }

    async fn perform(&self, id: T::Id, action: T::Action) -> Result<(), RemoteError> {
        self.call(|respond_to| RemoteCall::Perform {
            id,
            action,
            respond_to,
        })
        .await
    }
}

/// Creates a hand-answered remote and the receiver its calls arrive on.
///
/// # Testing Strategy
/// The store spawns each remote call, so from the test's point of view a call is "in
/// flight" until the test sends a response through the call's responder. Between those two
/// points the test can inspect the optimistic state, issue more requests, or answer
/// another call first.
pub fn create_mock_remote<T: SyncEntity>(
    buffer_size: usize,
) -> (Arc<ChannelRemote<T>>, mpsc::Receiver<RemoteCall<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (Arc::new(ChannelRemote { sender }), receiver)
}

/// Helper to verify that the next call is a `fetch_all`.
pub async fn expect_fetch_all<T: SyncEntity>(
    receiver: &mut mpsc::Receiver<RemoteCall<T>>,
) -> Option<Responder<Vec<T>>> {
    match receiver.recv().await {
        Some(RemoteCall::FetchAll { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next call is a `create`.
pub async fn expect_create<T: SyncEntity>(
    receiver: &mut mpsc::Receiver<RemoteCall<T>>,
) -> Option<(T::Create, Responder<T>)> {
    match receiver.recv().await {
        Some(RemoteCall::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is an `update`.
pub async fn expect_update<T: SyncEntity>(
    receiver: &mut mpsc::Receiver<RemoteCall<T>>,
) -> Option<(T::Id, T::Update, Responder<T>)> {
    match receiver.recv().await {
        Some(RemoteCall::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a `delete`.
pub async fn expect_delete<T: SyncEntity>(
    receiver: &mut mpsc::Receiver<RemoteCall<T>>,
) -> Option<(T::Id, Responder<()>)> {
    match receiver.recv().await {
        Some(RemoteCall::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a `perform`.
pub async fn expect_perform<T: SyncEntity>(
    receiver: &mut mpsc::Receiver<RemoteCall<T>>,
) -> Option<(T::Id, T::Action, Responder<()>)> {
    match receiver.recv().await {
        Some(RemoteCall::Perform {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
