//! The leveled logger.
//!
//! A [`Logger`] owns a prefix, a severity mask and two sinks: one for the
//! error channel and one shared by warn, info and debug. Lines look like
//!
//! ```text
//! 2024/05/01 13:37:00 [WARN] [svc] disk almost full
//! ```
//!
//! The `[prefix]` bracket is left out when the prefix is empty.

use crate::resolve::{self, Environment, ProcessEnv};
use crate::{Channel, Config, Result, Severity, Sink};
use chrono::{DateTime, Local};
use std::fmt::{self, Write as _};
use std::sync::atomic::{AtomicU32, Ordering};

/// Date and time layout at the start of every line
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Anything that can take messages on the four channels
pub trait Log {
    fn error(&self, args: fmt::Arguments<'_>);
    fn warn(&self, args: fmt::Arguments<'_>);
    fn info(&self, args: fmt::Arguments<'_>);
    fn debug(&self, args: fmt::Arguments<'_>);
}

impl<L: Log + ?Sized> Log for &L {
    fn error(&self, args: fmt::Arguments<'_>) {
        (**self).error(args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        (**self).warn(args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        (**self).info(args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        (**self).debug(args);
    }
}

/// Leveled logger writing prefixed, timestamped lines
#[derive(Debug)]
pub struct Logger {
    prefix: String,
    severity: AtomicU32,
    error_sink: Sink,
    other_sink: Sink,
}

impl Logger {
    /// Create a logger, folding the process environment into `severity`
    ///
    /// The environment is read once, here. See [`crate::resolve`] for the
    /// variables consulted and their precedence.
    pub fn new(
        prefix: impl Into<String>,
        severity: Severity,
        error_sink: Sink,
        other_sink: Sink,
    ) -> Self {
        Self::with_env(prefix, severity, error_sink, other_sink, &ProcessEnv)
    }

    /// Create a logger that sends every channel to one sink
    pub fn shared(prefix: impl Into<String>, severity: Severity, sink: Sink) -> Self {
        Self::new(prefix, severity, sink.clone(), sink)
    }

    /// Create a logger against an explicit environment snapshot
    pub fn with_env(
        prefix: impl Into<String>,
        severity: Severity,
        error_sink: Sink,
        other_sink: Sink,
        env: &impl Environment,
    ) -> Self {
        let prefix = prefix.into();
        let effective = resolve::resolve(&prefix, severity, env);
        tracing::debug!(
            "Logger {:?}: requested {}, effective {}",
            prefix,
            severity,
            effective
        );

        Self {
            prefix,
            severity: AtomicU32::new(effective.bits()),
            error_sink,
            other_sink,
        }
    }

    /// Build a logger from configuration, opening its sinks
    ///
    /// When both roles name the same target a single sink is opened and shared.
    pub fn from_config(config: &Config) -> Result<Self> {
        let error_sink = Sink::open(&config.output.error)?;
        let other_sink = if config.output.others == config.output.error {
            error_sink.clone()
        } else {
            Sink::open(&config.output.others)?
        };
        Ok(Self::new(
            config.prefix.clone(),
            config.severity,
            error_sink,
            other_sink,
        ))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Current mask
    pub fn severity(&self) -> Severity {
        Severity::from_bits_truncate(self.severity.load(Ordering::Acquire))
    }

    /// Replace the whole mask
    pub fn set_severity(&self, severity: Severity) {
        self.severity.store(severity.bits(), Ordering::Release);
    }

    pub fn enable(&self, channel: Channel) {
        self.severity
            .fetch_or(channel.bit().bits(), Ordering::AcqRel);
    }

    pub fn disable(&self, channel: Channel) {
        self.severity
            .fetch_and(!channel.bit().bits(), Ordering::AcqRel);
    }

    /// True when any bit of `bits` is enabled
    pub fn channel_enabled(&self, bits: impl Into<Severity>) -> bool {
        self.severity().intersects(bits)
    }

    /// Sink that `channel` writes to
    pub fn sink_for(&self, channel: Channel) -> &Sink {
        match channel {
            Channel::Error => &self.error_sink,
            _ => &self.other_sink,
        }
    }

    /// Write on `channel`, reporting a failed write
    ///
    /// A disabled channel does nothing and returns `Ok`.
    pub fn try_log(&self, channel: Channel, args: fmt::Arguments<'_>) -> Result<()> {
        if !self.channel_enabled(channel) {
            return Ok(());
        }
        let line = self.format_line(channel, Local::now(), args);
        self.sink_for(channel).write_line(&line)?;
        Ok(())
    }

    /// Write on `channel`; write failures are dropped
    pub fn log(&self, channel: Channel, args: fmt::Arguments<'_>) {
        let _ = self.try_log(channel, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Channel::Error, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Channel::Warn, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Channel::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Channel::Debug, args);
    }

    /// Render one line, newline included
    pub fn format_line(
        &self,
        channel: Channel,
        now: DateTime<Local>,
        args: fmt::Arguments<'_>,
    ) -> String {
        let mut line = String::with_capacity(64);
        // Writing into a String cannot fail
        let _ = write!(
            line,
            "{} [{}] ",
            now.format(TIMESTAMP_FORMAT),
            channel.label()
        );
        if !self.prefix.is_empty() {
            let _ = write!(line, "[{}] ", self.prefix);
        }
        let _ = line.write_fmt(args);
        if !line.ends_with('\n') {
            line.push('\n');
        }
        line
    }
}

impl Log for Logger {
    fn error(&self, args: fmt::Arguments<'_>) {
        Logger::error(self, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        Logger::warn(self, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        Logger::info(self, args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        Logger::debug(self, args);
    }
}
