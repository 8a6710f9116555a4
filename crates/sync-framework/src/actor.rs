//! # Generic Store Actor
//!
//! This module defines the `StoreActor`, the component that owns the local copy of one
//! resource collection. It implements the "Server" side of the Actor Model: requests are
//! processed one at a time on a single task, so the collection needs no locks.
//!
//! Remote calls are the exception. They are spawned onto their own tasks so that a slow
//! server does not stall unrelated requests, and their outcomes come back to the actor as
//! [`Settlement`] messages. Every change to the collection, optimistic or reconciling,
//! therefore still happens on the actor's task.

use crate::client::StoreClient;
use crate::collection::Collection;
use crate::entity::SyncEntity;
use crate::error::SyncError;
use crate::message::{Settlement, StoreRequest};
use crate::remote::Remote;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that keeps a local collection consistent with a remote authority.
///
/// ## Optimistic operations
///
/// * **Create**: nothing is inserted before the server answers, because the server assigns
///   the identifier. On success the returned entity is appended (or replaced in place if a
///   refresh already delivered it).
/// * **Update**: the entity is replaced in place by [`SyncEntity::merge`]. On success the
///   server's canonical value replaces it; on rejection the snapshot is restored at the same
///   position.
/// * **Delete**: the entity is removed at once. On rejection it is re-inserted at its
///   original index.
/// * **Action**: the value from [`SyncEntity::apply`] replaces the entity in place; on
///   rejection the snapshot is restored.
/// * **Refresh**: the whole collection is replaced by the remote snapshot. It never merges.
///
/// ## Ordering
///
/// Operations on *different* identifiers run concurrently and settle in whatever order the
/// remote side answers. Operations on the *same* identifier are queued: the next one starts
/// only after the previous one settled, so an update and a delete of one product cannot
/// race each other.
///
/// A refresh is not queued. If it completes while a mutation is in flight, whichever of the
/// two settles last determines the final state. A success that arrives after its entity
/// disappeared is discarded and reported as [`SyncError::NotFound`].
///
/// ## Usage Pattern
///
/// 1.  **Create**: Call `StoreActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass the remote collaborator into `actor.run(remote)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// ```rust
/// use std::sync::Arc;
/// use sync_framework::mock::MockRemote;
/// use sync_framework::{StoreActor, SyncEntity};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Note { id: String, text: String }
///
/// impl SyncEntity for Note {
///     type Id = String;
///     type Create = String;
///     type Update = String;
///     type Action = ();
///     fn id(&self) -> &String { &self.id }
///     fn merge(&self, text: &String) -> Self { Note { id: self.id.clone(), text: text.clone() } }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let remote = MockRemote::<Note>::new();
///     remote.expect_create().return_ok(Note { id: "n1".into(), text: "hello".into() });
///
///     let (actor, client) = StoreActor::<Note>::new(10);
///     tokio::spawn(actor.run(Arc::new(remote.clone())));
///
///     let note = client.create("hello".to_string()).await.unwrap();
///     assert_eq!(note.id, "n1");
///     assert_eq!(client.snapshot().await.unwrap().items, vec![note]);
///     remote.verify();
/// }
/// ```
pub struct StoreActor<T: SyncEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    settle_tx: mpsc::UnboundedSender<Settlement<T>>,
    settle_rx: mpsc::UnboundedReceiver<Settlement<T>>,
    collection: Collection<T>,
    /// Requests waiting behind an in-flight operation on the same identifier.
    pending: HashMap<T::Id, VecDeque<StoreRequest<T>>>,
    in_flight: usize,
    entity_type: &'static str,
}

impl<T: SyncEntity> StoreActor<T> {
    /// Creates a new `StoreActor` and its associated `StoreClient`.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full, client calls
    /// wait for space.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (settle_tx, settle_rx) = mpsc::unbounded_channel();
        // "Product" instead of "admin_console::model::product::Product"
        let entity_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        let actor = Self {
            receiver,
            settle_tx,
            settle_rx,
            collection: Collection::new(),
            pending: HashMap::new(),
            in_flight: 0,
            entity_type,
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the actor's event loop.
    ///
    /// The remote collaborator is injected here rather than in `new()`, so clients can be
    /// handed out before the remote side is wired. The loop ends once every client handle
    /// has been dropped and all in-flight remote calls have settled.
    pub async fn run(mut self, remote: Arc<dyn Remote<T>>) {
        let entity_type = self.entity_type;
        info!(entity_type, "Store started");

        let mut accepting = true;
        loop {
            if !accepting && self.in_flight == 0 {
                break;
            }
            tokio::select! {
                request = self.receiver.recv(), if accepting => match request {
                    Some(request) => self.handle(&remote, request),
                    None => {
                        debug!(entity_type, in_flight = self.in_flight, "Request channel closed");
                        accepting = false;
                    }
                },
                Some(settlement) = self.settle_rx.recv(), if self.in_flight > 0 => {
                    self.in_flight -= 1;
                    self.settle(&remote, settlement);
                }
                else => break,
            }
        }

        info!(
            entity_type,
            size = self.collection.len(),
            revision = self.collection.revision(),
            "Shutdown"
        );
    }

    fn handle(&mut self, remote: &Arc<dyn Remote<T>>, request: StoreRequest<T>) {
        let Some(id) = request.key().cloned() else {
            self.begin(remote, request);
            return;
        };

        if let Some(queue) = self.pending.get_mut(&id) {
            debug!(
                entity_type = self.entity_type,
                %id,
                kind = request.kind(),
                queued = queue.len() + 1,
                "Queued behind in-flight operation"
            );
            queue.push_back(request);
            return;
        }

        self.pending.insert(id.clone(), VecDeque::new());
        if !self.begin(remote, request) {
            self.advance(remote, &id);
        }
    }

    /// Starts a request. Returns `true` when a remote call is now outstanding.
    fn begin(&mut self, remote: &Arc<dyn Remote<T>>, request: StoreRequest<T>) -> bool {
        let entity_type = self.entity_type;
        match request {
            StoreRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(self.collection.snapshot());
                false
            }
            StoreRequest::Create { params, respond_to } => {
                debug!(entity_type, ?params, "Create");
                self.spawn(remote, move |remote| async move {
                    let result = remote.create(params).await;
                    Settlement::Created { result, respond_to }
                });
                true
            }
            StoreRequest::Refresh { respond_to } => {
                debug!(entity_type, "Refresh");
                self.spawn(remote, move |remote| async move {
                    let result = remote.fetch_all().await;
                    Settlement::Refreshed { result, respond_to }
                });
                true
            }
            StoreRequest::Update {
                id,
                update,
                respond_to,
            } => {
                debug!(entity_type, %id, ?update, "Update");
                let Some(index) = self.collection.position(&id) else {
                    warn!(entity_type, %id, "Not found");
                    let _ = respond_to.send(Err(SyncError::NotFound(id.to_string())));
                    return false;
                };
                let speculative = self.collection.items()[index].merge(&update);
                let snapshot = self.collection.replace_at(index, speculative);
                self.spawn(remote, move |remote| async move {
                    let result = remote.update(id.clone(), update).await;
                    Settlement::Updated {
                        id,
                        snapshot,
                        result,
                        respond_to,
                    }
                });
                true
            }
            StoreRequest::Delete { id, respond_to } => {
                debug!(entity_type, %id, "Delete");
                let Some(snapshot) = self.collection.remove(&id) else {
                    warn!(entity_type, %id, "Not found");
                    let _ = respond_to.send(Err(SyncError::NotFound(id.to_string())));
                    return false;
                };
                self.spawn(remote, move |remote| async move {
                    let result = remote.delete(id.clone()).await;
                    Settlement::Deleted {
                        id,
                        snapshot,
                        result,
                        respond_to,
                    }
                });
                true
            }
            StoreRequest::Action {
                id,
                action,
                respond_to,
            } => {
                debug!(entity_type, %id, ?action, "Action");
                let Some(index) = self.collection.position(&id) else {
                    warn!(entity_type, %id, "Not found");
                    let _ = respond_to.send(Err(SyncError::NotFound(id.to_string())));
                    return false;
                };
                let applied = match self.collection.items()[index].apply(&action) {
                    Ok(applied) => applied,
                    Err(e) => {
                        warn!(entity_type, %id, error = %e, "Action refused");
                        let _ = respond_to.send(Err(e));
                        return false;
                    }
                };
                let snapshot = self.collection.replace_at(index, applied.clone());
                self.spawn(remote, move |remote| async move {
                    let result = remote.perform(id.clone(), action).await;
                    Settlement::Acted {
                        id,
                        snapshot,
                        applied,
                        result,
                        respond_to,
                    }
                });
                true
            }
        }
    }

    fn spawn<F, Fut>(&mut self, remote: &Arc<dyn Remote<T>>, call: F)
    where
        F: FnOnce(Arc<dyn Remote<T>>) -> Fut,
        Fut: Future<Output = Settlement<T>> + Send + 'static,
    {
        let settle_tx = self.settle_tx.clone();
        let call = call(Arc::clone(remote));
        self.in_flight += 1;
        tokio::spawn(async move {
            // The receiver lives as long as the actor, which outlives every in-flight call.
            let _ = settle_tx.send(call.await);
        });
    }

    fn settle(&mut self, remote: &Arc<dyn Remote<T>>, settlement: Settlement<T>) {
        let entity_type = self.entity_type;
        let key = settlement.key().cloned();

        match settlement {
            Settlement::Created { result, respond_to } => match result {
                Ok(item) => {
                    let id = item.id().clone();
                    self.collection.upsert(item.clone());
                    self.collection.bump();
                    info!(entity_type, %id, size = self.collection.len(), "Created");
                    let _ = respond_to.send(Ok(item));
                }
                Err(e) => {
                    warn!(entity_type, error = %e, "Create rejected");
                    let _ = respond_to.send(Err(e.into()));
                }
            },
            Settlement::Updated {
                id,
                snapshot,
                result,
                respond_to,
            } => match result {
                Ok(canonical) => match self.collection.position(&id) {
                    Some(index) => {
                        self.collection.replace_at(index, canonical.clone());
                        self.collection.bump();
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(canonical));
                    }
                    None => {
                        warn!(entity_type, %id, "Late update discarded");
                        let _ = respond_to.send(Err(SyncError::NotFound(id.to_string())));
                    }
                },
                Err(e) => {
                    if self.collection.position(&id).is_some() {
                        self.collection.restore(snapshot);
                    }
                    warn!(entity_type, %id, error = %e, "Update rejected, rolled back");
                    let _ = respond_to.send(Err(e.into()));
                }
            },
            Settlement::Deleted {
                id,
                snapshot,
                result,
                respond_to,
            } => match result {
                Ok(()) => {
                    if self.collection.remove(&id).is_some() {
                        debug!(entity_type, %id, "Removed entity a refresh brought back");
                    }
                    self.collection.bump();
                    info!(entity_type, %id, size = self.collection.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                Err(e) => {
                    let index = snapshot.index;
                    self.collection.restore(snapshot);
                    warn!(entity_type, %id, index, error = %e, "Delete rejected, restored");
                    let _ = respond_to.send(Err(e.into()));
                }
            },
            Settlement::Acted {
                id,
                snapshot,
                applied,
                result,
                respond_to,
            } => match result {
                Ok(()) => match self.collection.position(&id) {
                    Some(index) => {
                        self.collection.replace_at(index, applied.clone());
                        self.collection.bump();
                        info!(entity_type, %id, "Action ok");
                        let _ = respond_to.send(Ok(applied));
                    }
                    None => {
                        warn!(entity_type, %id, "Late action result discarded");
                        let _ = respond_to.send(Err(SyncError::NotFound(id.to_string())));
                    }
                },
                Err(e) => {
                    if self.collection.position(&id).is_some() {
                        self.collection.restore(snapshot);
                    }
                    warn!(entity_type, %id, error = %e, "Action rejected, rolled back");
                    let _ = respond_to.send(Err(e.into()));
                }
            },
            Settlement::Refreshed { result, respond_to } => match result {
                Ok(items) => {
                    self.collection.replace_all(items.clone());
                    self.collection.bump();
                    info!(entity_type, size = items.len(), "Refreshed");
                    let _ = respond_to.send(Ok(items));
                }
                Err(e) => {
                    warn!(entity_type, error = %e, "Refresh failed");
                    let _ = respond_to.send(Err(e.into()));
                }
            },
        }

        if let Some(id) = key {
            self.advance(remote, &id);
        }
    }

    /// Starts the next queued request for `id`, skipping any that finish without a remote call.
    fn advance(&mut self, remote: &Arc<dyn Remote<T>>, id: &T::Id) {
        loop {
            let next = match self.pending.get_mut(id) {
                Some(queue) => queue.pop_front(),
                None => return,
            };
            match next {
                Some(request) => {
                    if self.begin(remote, request) {
                        return;
                    }
                }
                None => {
                    self.pending.remove(id);
                    return;
                }
            }
        }
    }
}
