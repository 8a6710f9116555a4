//! [`SyncEntity`] implementation for [`Order`].
//!
//! Orders are created by the storefront, never by the console, so the only mutation the
//! store supports is [`OrderAction::SetStatus`]. Its speculative value comes from the
//! status machine in [`super::status`].

use super::status::apply_transition;
use crate::model::{Order, OrderId, OrderStatus};
use sync_framework::{SyncEntity, SyncError};

/// Order-specific operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    SetStatus(OrderStatus),
}

impl SyncEntity for Order {
    type Id = OrderId;
    type Create = ();
    type Update = ();
    type Action = OrderAction;

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn apply(&self, action: &OrderAction) -> Result<Self, SyncError> {
        match action {
            OrderAction::SetStatus(status) => {
                apply_transition(self, *status).map_err(|e| SyncError::Validation(e.to_string()))
            }
        }
    }
}
