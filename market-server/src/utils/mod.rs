//! Utilities

pub mod logger;

pub use logger::{cleanup_old_logs, init_logger};
