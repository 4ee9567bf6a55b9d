//! Error types for the sevlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sevlog_core operations
///
/// Building a logger and plain emission never fail. These variants cover
/// the fallible edges: config files, opening sinks, parsing user input and
/// explicit write reporting through [`crate::Logger::try_log`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A severity mask string could not be parsed
    #[error("Invalid severity: {0}")]
    InvalidSeverity(String),

    /// A channel label could not be parsed
    #[error("Invalid channel: {0}")]
    InvalidChannel(String),

    /// The process-wide default logger was already set up
    #[error("default logger already initialized")]
    AlreadyInitialized,
}
