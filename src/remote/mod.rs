//! # Remote Adapters
//!
//! The backend is reached through [`AdminApi`], one method per endpoint the console uses.
//! [`ApiRemote`] turns an `AdminApi` into the per-resource
//! [`Remote`](sync_framework::Remote) collaborators the stores are started with.
//!
//! ```text
//! ProductClient -> StoreActor<Product> --+
//!                                        +--> ApiRemote<A> --> A: AdminApi (HttpAdminApi)
//! OrderClient   -> StoreActor<Order>   --+
//! ```

pub mod http;

pub use http::HttpAdminApi;

use crate::model::{Order, OrderId, OrderStatus, Product, ProductId};
use crate::order_actor::OrderAction;
use crate::product_actor::ProductPatch;
use crate::upload::MultipartPayload;
use async_trait::async_trait;
use std::sync::Arc;
use sync_framework::{Remote, RemoteError};

/// Backend operations used by the console.
#[async_trait]
pub trait AdminApi: Send + Sync + 'static {
    async fn fetch_products(&self) -> Result<Vec<Product>, RemoteError>;

    /// Orders, newest first.
    async fn fetch_orders(&self) -> Result<Vec<Order>, RemoteError>;

    async fn create_product(&self, payload: MultipartPayload) -> Result<Product, RemoteError>;

    async fn update_product(
        &self,
        id: ProductId,
        payload: MultipartPayload,
    ) -> Result<Product, RemoteError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), RemoteError>;

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RemoteError>;
}

/// Exposes an [`AdminApi`] as the remote side of both stores.
pub struct ApiRemote<A> {
    api: Arc<A>,
}

impl<A> ApiRemote<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }
}

impl<A> Clone for ApiRemote<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
        }
    }
}

#[async_trait]
impl<A: AdminApi> Remote<Product> for ApiRemote<A> {
    async fn fetch_all(&self) -> Result<Vec<Product>, RemoteError> {
        self.api.fetch_products().await
    }

    async fn create(&self, payload: MultipartPayload) -> Result<Product, RemoteError> {
        self.api.create_product(payload).await
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, RemoteError> {
        self.api.update_product(id, patch.payload).await
    }

    async fn delete(&self, id: ProductId) -> Result<(), RemoteError> {
        self.api.delete_product(id).await
    }
}

#[async_trait]
impl<A: AdminApi> Remote<Order> for ApiRemote<A> {
    async fn fetch_all(&self) -> Result<Vec<Order>, RemoteError> {
        self.api.fetch_orders().await
    }

    async fn perform(&self, id: OrderId, action: OrderAction) -> Result<(), RemoteError> {
        match action {
            OrderAction::SetStatus(status) => self.api.update_order_status(id, status).await,
        }
    }
}
