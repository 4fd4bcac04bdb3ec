//! Shared utilities: logging initialization and time helpers.

pub mod logging;
pub mod time;

pub use logging::{init_tracing, init_tracing_with_level};
pub use time::format_duration;
