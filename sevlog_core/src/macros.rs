//! Formatting macros for the four channels.
//!
//! Each macro takes `format!`-style arguments. With a leading string literal
//! it writes to [`default_logger`](crate::default_logger); otherwise the first
//! argument is the logger to use:
//!
//! ```
//! use sevlog_core::{info, warn, Logger, Severity, Sink};
//!
//! let logger = Logger::shared("svc", Severity::ALL, Sink::new(Vec::new()));
//! warn!(logger, "retrying in {}s", 5);
//! info!("started");
//! ```
//!
//! Arguments are only formatted when the channel is enabled.

/// Log on the error channel
#[macro_export]
macro_rules! error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::default_logger().log($crate::Channel::Error, format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::Log::error(&$logger, format_args!($($arg)+))
    };
}

/// Log on the warn channel
#[macro_export]
macro_rules! warn {
    ($fmt:literal $($arg:tt)*) => {
        $crate::default_logger().log($crate::Channel::Warn, format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::Log::warn(&$logger, format_args!($($arg)+))
    };
}

/// Log on the info channel
#[macro_export]
macro_rules! info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::default_logger().log($crate::Channel::Info, format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::Log::info(&$logger, format_args!($($arg)+))
    };
}

/// Log on the debug channel
#[macro_export]
macro_rules! debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::default_logger().log($crate::Channel::Debug, format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::Log::debug(&$logger, format_args!($($arg)+))
    };
}
