//! Plain domain data: catalog products and customer orders.

pub mod order;
pub mod product;

pub use order::*;
pub use product::*;
