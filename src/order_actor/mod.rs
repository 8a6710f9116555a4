//! Order store: status changes applied optimistically and confirmed by the backend.

pub mod entity;
pub mod error;
pub mod status;

pub use entity::*;
pub use error::*;
pub use status::apply_transition;

use crate::clients::OrderClient;
use crate::model::Order;
use sync_framework::StoreActor;

/// Creates a new Order store and its client.
pub fn new(buffer: usize) -> (StoreActor<Order>, OrderClient) {
    let (actor, generic_client) = StoreActor::new(buffer);
    let client = OrderClient::new(generic_client);

    (actor, client)
}
