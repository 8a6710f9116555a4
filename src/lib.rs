//! # Admin Console
//!
//! > **The core of an e-commerce admin console: catalog and order state, uploads and reports.**
//!
//! The console keeps local copies of the product catalog and the order list, changes them
//! **optimistically** while the backend confirms, and renders the same state into CSV and
//! PDF reports.
//!
//! ## 🏗️ Design
//!
//! Each collection is owned by a store from the [`sync_framework`] crate. A store applies
//! a change locally, calls the backend in the background, then keeps the backend's answer
//! or puts the previous value back. Operations on the same product or order wait for each
//! other; operations on different ones overlap freely.
//!
//! Reports never read the clock or the network. They take a snapshot and a "generated at"
//! instant and return bytes.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! - **Key items**: [`Product`](model::Product), [`ProductDraft`](model::ProductDraft),
//!   [`Order`](model::Order), [`OrderStatus`](model::OrderStatus).
//!
//! ### 2. The Stores ([`product_actor`], [`order_actor`])
//! How each resource plugs into the generic store: speculative values, payload types and
//! the order status machine ([`order_actor::apply_transition`]).
//!
//! ### 3. The Interface ([`clients`])
//! - **Key items**: [`ProductClient`](clients::ProductClient) (add, update, remove),
//!   [`OrderClient`](clients::OrderClient) (status changes).
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! - **Key items**: [`AdminConsole`](lifecycle::AdminConsole) starts both stores, builds
//!   exports and dashboard figures, and shuts everything down.
//!
//! ### 5. Encoding ([`upload`], [`report`], [`export`])
//! Multipart submissions for product forms; tabular model, CSV and paginated PDF encoders;
//! the four fixed report shapes.
//!
//! ### 6. The Outside World ([`remote`], [`config`])
//! The backend API behind a trait, its HTTP implementation, and settings.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! ADMIN__TOKEN=... RUST_LOG=info admin-console products
//! admin-console export orders pdf
//! admin-console set-status 6650f0c2 shipped
//! ```

pub mod clients;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod product_actor;
pub mod remote;
pub mod report;
pub mod upload;
