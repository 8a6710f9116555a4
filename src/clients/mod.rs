//! Type-safe wrappers around [`StoreClient`](sync_framework::StoreClient).

pub mod order_client;
pub mod product_client;

pub use order_client::*;
pub use product_client::*;
