//! # SyncClient Trait
//!
//! Provides a common interface for resource-specific clients, adding default `snapshot`,
//! `items` and `refresh` methods built on top of a generic `StoreClient`.
use crate::{StoreClient, StoreSnapshot, SyncEntity, SyncError};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the read and refresh operations.
///
/// # Example
///
/// ```rust
/// use sync_framework::{StoreClient, SyncClient, SyncEntity, SyncError};
///
/// #[derive(Clone, Debug)]
/// struct Note { id: String }
///
/// impl SyncEntity for Note {
///     type Id = String;
///     type Create = ();
///     type Update = ();
///     type Action = ();
///     fn id(&self) -> &String { &self.id }
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("{0}")]
/// struct NoteError(String);
///
/// impl From<String> for NoteError {
///     fn from(s: String) -> Self { NoteError(s) }
/// }
///
/// struct NoteClient {
///     inner: StoreClient<Note>,
/// }
///
/// impl SyncClient<Note> for NoteClient {
///     type Error = NoteError;
///
///     fn inner(&self) -> &StoreClient<Note> {
///         &self.inner
///     }
///
///     fn map_error(e: SyncError) -> Self::Error {
///         NoteError(e.to_string())
///     }
/// }
///
/// async fn usage(client: NoteClient) {
///     // snapshot(), items() and refresh() are provided automatically
///     let _ = client.refresh().await;
///     let _ = client.items().await;
/// }
/// ```
#[async_trait]
pub trait SyncClient<T: SyncEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic StoreClient.
    fn inner(&self) -> &StoreClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: SyncError) -> Self::Error;

    /// Read-only view of the local collection and its revision.
    #[tracing::instrument(skip(self))]
    async fn snapshot(&self) -> Result<StoreSnapshot<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().snapshot().await.map_err(Self::map_error)
    }

    /// The local collection without its revision.
    async fn items(&self) -> Result<Vec<T>, Self::Error> {
        Ok(self.snapshot().await?.items)
    }

    /// Replace the local collection from the remote side.
    #[tracing::instrument(skip(self))]
    async fn refresh(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().refresh().await.map_err(Self::map_error)
    }
}
