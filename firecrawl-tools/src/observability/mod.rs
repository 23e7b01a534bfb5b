//! Observability utilities.
//!
//! The tools emit `tracing` events and spans; each invocation runs inside a
//! span carrying a fresh invocation id. Installing a subscriber is left to the
//! embedding application, with [`init_tracing`] as a ready-made option.

mod subscriber;

pub use subscriber::{init_tracing, LogFormat, DEFAULT_FILTER};
