//! Cadence CLI Library
//!
//! Session bootstrap for the `cadence` binary: load configuration, restore
//! the saved queue, apply one command, save the queue again.
//!
//! This library exposes the session for testing purposes.

pub mod config;
pub mod error;
pub mod session;

// Re-export commonly used types for convenience
pub use config::{CadenceConfig, StorageSettings};
pub use error::{CliError, Result};
pub use session::Session;
