//! `washdesk-observability`
//!
//! **Responsibility:** logging/tracing initialization shared by the client
//! binary and tests.

pub mod tracing;

pub use self::tracing::{init, init_json};
