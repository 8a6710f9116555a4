//! # Observability & Tracing
//!
//! Structured logging for every store and client built on this crate.
//!
//! ## What Gets Traced
//!
//! - **Store lifecycle**: startup, request channel closure, shutdown with final size and revision
//! - **Requests**: Create, Update, Delete, Action, Refresh (payloads at `debug`)
//! - **Reconciliation**: successes at `info`; rejections, rollbacks and discarded late
//!   responses at `warn`
//! - **Queueing**: requests parked behind an in-flight operation on the same identifier
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info admin-console products      # Compact logs
//! RUST_LOG=debug admin-console products     # Full payloads
//! ```
//!
//! With `RUST_LOG=info`, a rejected deletion reads:
//!
//! ```text
//! INFO Store started entity_type="Product"
//! INFO Refreshed entity_type="Product" size=2
//! WARN Delete rejected, restored entity_type="Product" id=b index=1 error=Product is locked
//! ```

/// Initializes the tracing subscriber.
///
/// Filtering comes from `RUST_LOG`. Module paths are hidden because every store event
/// already carries an `entity_type` field.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
