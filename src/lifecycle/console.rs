use crate::clients::{OrderClient, ProductClient};
use crate::dashboard::DashboardStats;
use crate::export::{self, Export, ExportOptions};
use crate::model::{Order, Product};
use crate::remote::{AdminApi, ApiRemote};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use sync_framework::{Remote, SyncClient};
use tracing::{error, info};

/// Runs the console's stores and exposes everything the UI needs.
///
/// `AdminConsole` is responsible for:
/// - **Lifecycle Management**: starting both stores and stopping them
/// - **Dependency Wiring**: handing each store its remote collaborator
/// - **Read Models**: exports and dashboard figures built from the current snapshots
///
/// # Example
///
/// ```ignore
/// let api = Arc::new(HttpAdminApi::from_settings(&settings));
/// let console = AdminConsole::new(api, settings.store_buffer, ExportOptions::default());
///
/// console.refresh_all().await?;
/// console.order_client.set_order_status(id, OrderStatus::Shipped).await?;
/// let report = console.export_orders_csv(Utc::now()).await?;
///
/// console.shutdown().await?;
/// ```
pub struct AdminConsole {
    /// Client for the Product store
    pub product_client: ProductClient,

    /// Client for the Order store
    pub order_client: OrderClient,

    export_options: ExportOptions,

    /// Store tasks (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl AdminConsole {
    /// Starts both stores against one backend.
    pub fn new<A: AdminApi>(api: Arc<A>, buffer: usize, export_options: ExportOptions) -> Self {
        let remote = ApiRemote::new(api);
        Self::with_remotes(
            Arc::new(remote.clone()),
            Arc::new(remote),
            buffer,
            export_options,
        )
    }

    /// Starts both stores with separate remotes, e.g. test doubles.
    pub fn with_remotes(
        product_remote: Arc<dyn Remote<Product>>,
        order_remote: Arc<dyn Remote<Order>>,
        buffer: usize,
        export_options: ExportOptions,
    ) -> Self {
        let (product_actor, product_client) = crate::product_actor::new(buffer);
        let (order_actor, order_client) = crate::order_actor::new(buffer);

        let product_handle = tokio::spawn(product_actor.run(product_remote));
        let order_handle = tokio::spawn(order_actor.run(order_remote));

        Self {
            product_client,
            order_client,
            export_options,
            handles: vec![product_handle, order_handle],
        }
    }

    /// Reloads both collections from the backend.
    pub async fn refresh_all(&self) -> anyhow::Result<()> {
        let (products, orders) = tokio::join!(
            self.product_client.refresh(),
            self.order_client.refresh()
        );
        let products = products.context("Failed to load products")?;
        let orders = orders.context("Failed to load orders")?;
        info!(products = products.len(), orders = orders.len(), "Collections loaded");
        Ok(())
    }

    pub async fn stats(&self) -> anyhow::Result<DashboardStats> {
        let products = self.product_client.items().await?;
        let orders = self.order_client.items().await?;
        Ok(DashboardStats::from_snapshots(&products, &orders))
    }

    pub async fn export_products_csv(&self, generated_at: DateTime<Utc>) -> anyhow::Result<Export> {
        let products = self.product_client.items().await?;
        Ok(export::export_products_csv(&products, &self.export_options, generated_at)?)
    }

    pub async fn export_products_document(
        &self,
        generated_at: DateTime<Utc>,
    ) -> anyhow::Result<Export> {
        let products = self.product_client.items().await?;
        Ok(export::export_products_document(&products, &self.export_options, generated_at)?)
    }

    pub async fn export_orders_csv(&self, generated_at: DateTime<Utc>) -> anyhow::Result<Export> {
        let orders = self.order_client.items().await?;
        Ok(export::export_orders_csv(&orders, &self.export_options, generated_at)?)
    }

    pub async fn export_orders_document(
        &self,
        generated_at: DateTime<Utc>,
    ) -> anyhow::Result<Export> {
        let orders = self.order_client.items().await?;
        Ok(export::export_orders_document(&orders, &self.export_options, generated_at)?)
    }

    /// Stops both stores.
    ///
    /// Dropping the clients closes the request channels. Each store then finishes the remote
    /// calls it still has in flight and exits, so no started operation is abandoned.
    ///
    /// Clones of the clients handed out earlier keep their store alive until they are
    /// dropped too.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        info!("Shutting down console...");

        drop(self.product_client);
        drop(self.order_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                anyhow::bail!("Store task failed: {e}");
            }
        }

        info!("Console shutdown complete.");
        Ok(())
    }
}
