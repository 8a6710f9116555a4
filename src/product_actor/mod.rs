//! Product store: catalog edits applied optimistically and confirmed by the backend.

pub mod entity;
pub mod error;

pub use entity::*;
pub use error::*;

use crate::clients::ProductClient;
use crate::model::Product;
use sync_framework::StoreActor;

/// Creates a new Product store and its client.
pub fn new(buffer: usize) -> (StoreActor<Product>, ProductClient) {
    let (actor, generic_client) = StoreActor::new(buffer);
    let client = ProductClient::new(generic_client);

    (actor, client)
}
