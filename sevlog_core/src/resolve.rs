//! Environment-driven severity resolution.
//!
//! A logger's effective mask is computed once, when it is built:
//!
//! 1. Start from the mask the caller asked for.
//! 2. If `LOG_LEVEL_DEFAULT` holds an integer, it replaces that mask outright.
//! 3. For each channel (error, warn, info, debug), the first variable set among
//!    `<PREFIX>_LOG_LEVEL_<LABEL>` and `LOG_LEVEL_<LABEL>` decides the channel:
//!    the exact string `"0"` turns it off, any other value turns it on.
//!
//! Unset variables carry no opinion. The environment is read through the
//! [`Environment`] trait so tests can hand in a snapshot.

use crate::{Channel, Severity};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Full-mask override variable
pub const DEFAULT_VAR: &str = "LOG_LEVEL_DEFAULT";

/// Stem shared by the per-channel override variables
pub const VAR_STEM: &str = "LOG_LEVEL";

/// Source of environment variables
pub trait Environment {
    /// Value of `key`, or `None` when it is not set
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        // A non-UTF-8 value is still "set", so convert rather than drop it
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

impl<S: BuildHasher> Environment for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// What a per-channel variable asks for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Override {
    Enable,
    Disable,
}

impl Override {
    /// Only the exact string `"0"` disables
    pub fn from_value(value: &str) -> Self {
        if value == "0" {
            Override::Disable
        } else {
            Override::Enable
        }
    }

    fn apply(self, severity: &mut Severity, channel: Channel) {
        match self {
            Override::Enable => severity.insert(channel),
            Override::Disable => severity.remove(channel),
        }
    }
}

/// Compute the effective mask for a logger with `prefix`
pub fn resolve(prefix: &str, requested: Severity, env: &impl Environment) -> Severity {
    let mut severity = default_override(env).unwrap_or(requested);

    for channel in Channel::ALL {
        if let Some((var, value)) = channel_override(prefix, channel, env) {
            let action = Override::from_value(&value);
            tracing::debug!("{}={:?} -> {:?} {}", var, value, action, channel);
            action.apply(&mut severity, channel);
        }
    }

    severity
}

/// Mask requested through `LOG_LEVEL_DEFAULT`, if it is set and numeric
pub fn default_override(env: &impl Environment) -> Option<Severity> {
    let raw = env.get(DEFAULT_VAR)?;
    match raw.parse::<i32>() {
        Ok(bits) => Some(Severity::from_bits_truncate(bits as u32)),
        Err(e) => {
            tracing::debug!("Ignoring {}={:?}: {}", DEFAULT_VAR, raw, e);
            None
        }
    }
}

/// First variable set for `channel`, with its value
pub fn channel_override(
    prefix: &str,
    channel: Channel,
    env: &impl Environment,
) -> Option<(String, String)> {
    channel_variables(prefix, channel)
        .into_iter()
        .find_map(|var| env.get(&var).map(|value| (var, value)))
}

/// Variable names consulted for `channel`, most specific first
///
/// The prefix-qualified name is only produced for a non-empty prefix.
pub fn channel_variables(prefix: &str, channel: Channel) -> Vec<String> {
    let global = format!("{}_{}", VAR_STEM, channel.label());
    if prefix.is_empty() {
        vec![global]
    } else {
        vec![format!("{}_{}", env_prefix(prefix), global), global]
    }
}

/// Upper-case the prefix and replace anything unusable in a variable name
fn env_prefix(prefix: &str) -> String {
    prefix
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
