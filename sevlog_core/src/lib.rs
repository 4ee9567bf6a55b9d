#![forbid(unsafe_code)]

//! Minimal leveled logging with environment-driven channel control.
//!
//! This crate provides:
//! - Four channels (error, warn, info, debug) selected by a bitmask
//! - Environment overrides resolved once per logger
//! - Timestamped, prefixed line output to stdout, stderr or a file
//! - A process-wide default logger and `format!`-style macros
//! - TOML configuration

pub mod severity;
pub mod error;
pub mod resolve;
pub mod sink;
pub mod config;
pub mod logging;
pub mod logger;
pub mod global;
mod macros;

// Re-export commonly used types
pub use error::{Error, Result};
pub use severity::{Channel, Severity};
pub use resolve::{resolve, Environment, ProcessEnv};
pub use sink::{Sink, Target};
pub use config::{Config, OutputConfig};
pub use logger::{Log, Logger, TIMESTAMP_FORMAT};
pub use global::{default_logger, install_default};
