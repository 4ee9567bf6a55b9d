//! Process-wide default logger.
//!
//! The default logger is created at most once per process. Either call
//! [`install_default`] early during startup to supply a custom logger, or let
//! the first call to [`default_logger`] build the standard one: no prefix,
//! [`Severity::DEFAULT`] adjusted by the environment, the error channel on
//! stderr and everything else on stdout.

use crate::{Error, Logger, Result, Severity, Sink};
use once_cell::sync::OnceCell;

static DEFAULT_LOGGER: OnceCell<Logger> = OnceCell::new();

/// The shared logger used by the argument-less macro forms
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| {
        Logger::new("", Severity::DEFAULT, Sink::stderr(), Sink::stdout())
    })
}

/// Install `logger` as the process-wide default
///
/// Fails with [`Error::AlreadyInitialized`] when a default already exists,
/// including one created implicitly by an earlier [`default_logger`] call.
pub fn install_default(logger: Logger) -> Result<()> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| Error::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Channel;

    #[test]
    fn test_default_logger_is_created_once() {
        let first = default_logger();
        let second = default_logger();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.prefix(), "");

        // Error goes to stderr, the other three share stdout
        let error_sink = first.sink_for(Channel::Error);
        let info_sink = first.sink_for(Channel::Info);
        assert!(!error_sink.same_as(info_sink));
        assert!(info_sink.same_as(first.sink_for(Channel::Warn)));
        assert!(info_sink.same_as(first.sink_for(Channel::Debug)));

        let late = Logger::shared("late", Severity::ALL, Sink::new(Vec::new()));
        assert!(matches!(
            install_default(late),
            Err(Error::AlreadyInitialized)
        ));
    }
}
