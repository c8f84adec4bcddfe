//! Logging utilities.
//!
//! The engine only ever talks to the `log` facade; this module is the single
//! place that installs a backend (`env_logger`) for binaries.

mod init;

pub use init::{init_logging, LoggingConfig};
