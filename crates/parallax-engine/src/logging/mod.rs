//! Logging setup.
//!
//! The engine only talks to the `log` facade. The studio binary (or a test that
//! wants output) calls [`init_logging`] once to install `env_logger` behind it.

mod init;

pub use init::{init_logging, LoggingConfig};
