use crate::model::{Order, OrderId, OrderStatus};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use sync_framework::{StoreClient, SyncClient, SyncError};
use tracing::{info, instrument, warn};

/// Client for the Order store.
#[derive(Clone)]
pub struct OrderClient {
    inner: StoreClient<Order>,
}

impl OrderClient {
    pub fn new(inner: StoreClient<Order>) -> Self {
        Self { inner }
    }

    /// Moves an order to `status`.
    ///
    /// The new status is shown at once. If the backend refuses, the order goes back to
    /// the status it had before. Leaving `Delivered` is refused without contacting the
    /// backend and reported as [`OrderError::InvalidTransition`].
    #[instrument(skip_all, fields(id = %id, status = %status))]
    pub async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        info!("Sending set_order_status to store");
        match self
            .inner
            .perform(id.clone(), OrderAction::SetStatus(status))
            .await
        {
            Err(SyncError::Validation(reason)) => Err(self.refusal(&id, status, reason).await),
            other => other.map_err(Self::map_error),
        }
    }

    /// Rebuilds the structured transition error from the status the store refused to leave.
    async fn refusal(&self, id: &OrderId, to: OrderStatus, reason: String) -> OrderError {
        match self.get_order(id).await {
            Ok(order) if !order.status.can_transition_to(to) => {
                warn!(from = %order.status, "Transition refused");
                OrderError::InvalidTransition {
                    id: id.to_string(),
                    from: order.status,
                    to,
                }
            }
            _ => OrderError::ValidationError(reason),
        }
    }

    pub async fn get_order(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.items()
            .await?
            .into_iter()
            .find(|order| &order.id == id)
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl SyncClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &StoreClient<Order> {
        &self.inner
    }

    fn map_error(e: SyncError) -> Self::Error {
        e.into()
    }
}
