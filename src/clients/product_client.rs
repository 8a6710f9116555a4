use crate::model::{Product, ProductDraft, ProductId};
use crate::product_actor::{ProductError, ProductPatch};
use crate::upload;
use async_trait::async_trait;
use sync_framework::{StoreClient, SyncClient, SyncError};
use tracing::{debug, info, instrument};

/// Client for the Product store.
///
/// Drafts are validated and encoded here, before any request reaches the store, so an
/// invalid form never changes the local collection.
#[derive(Clone)]
pub struct ProductClient {
    inner: StoreClient<Product>,
}

impl ProductClient {
    pub fn new(inner: StoreClient<Product>) -> Self {
        Self { inner }
    }

    /// Creates a product. Nothing is shown locally until the backend has assigned an id;
    /// the returned product is then appended.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add_product(&self, draft: ProductDraft) -> Result<Product, ProductError> {
        debug!(?draft, "add_product called");
        let payload = upload::encode_draft(&draft)?;

        info!("Sending add_product to store");
        self.inner.create(payload).await.map_err(Self::map_error)
    }

    /// Replaces the product in place with the draft while the upload runs, then with the
    /// backend's value. A rejection restores the previous product.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> Result<Product, ProductError> {
        debug!(?draft, "update_product called");
        let patch = ProductPatch::new(draft)?;

        info!("Sending update_product to store");
        self.inner.update(id, patch).await.map_err(Self::map_error)
    }

    /// Removes the product at once; a rejection puts it back at the same position.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn remove_product(&self, id: ProductId) -> Result<(), ProductError> {
        info!("Sending remove_product to store");
        self.inner.delete(id).await.map_err(Self::map_error)
    }

    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.items()
            .await?
            .into_iter()
            .find(|product| &product.id == id)
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl SyncClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &StoreClient<Product> {
        &self.inner
    }

    fn map_error(e: SyncError) -> Self::Error {
        e.into()
    }
}
