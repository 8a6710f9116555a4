//! # Console Lifecycle
//!
//! Startup, wiring and shutdown of the console's stores. See [`AdminConsole`].

mod console;

pub use console::AdminConsole;
