//! Severity channels and the bitmask that enables them.
//!
//! There are exactly four channels: Error, Warn, Info and Debug. Each owns one
//! bit of a [`Severity`] mask, and a mask is any union of those bits. Bits
//! outside the four defined ones are dropped on every construction path, so a
//! `Severity` never carries meaningless state.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};
use std::str::FromStr;

// ============================================================================
// Channel
// ============================================================================

/// One of the four independent output channels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[serde(alias = "ERROR")]
    Error,
    #[serde(alias = "WARN")]
    Warn,
    #[serde(alias = "INFO")]
    Info,
    #[serde(alias = "DEBUG")]
    Debug,
}

impl Channel {
    /// Every channel, in the order environment overrides are applied
    pub const ALL: [Channel; 4] = [Channel::Error, Channel::Warn, Channel::Info, Channel::Debug];

    /// Label used in output lines and environment variable names
    pub const fn label(self) -> &'static str {
        match self {
            Channel::Error => "ERROR",
            Channel::Warn => "WARN",
            Channel::Info => "INFO",
            Channel::Debug => "DEBUG",
        }
    }

    /// The single mask bit owned by this channel
    pub const fn bit(self) -> Severity {
        match self {
            Channel::Error => Severity::ERROR,
            Channel::Warn => Severity::WARN,
            Channel::Info => Severity::INFO,
            Channel::Debug => Severity::DEBUG,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Channel::ALL
            .into_iter()
            .find(|channel| channel.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidChannel(s.to_string()))
    }
}

// ============================================================================
// Severity mask
// ============================================================================

/// Set of enabled channels, stored as explicit bits
///
/// ```
/// use sevlog_core::{Channel, Severity};
///
/// let mask = Severity::ERROR | Severity::WARN;
/// assert!(mask.intersects(Channel::Warn));
/// assert!(!mask.intersects(Severity::DEBUG));
/// assert_eq!(mask.bits(), 3);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "SeverityRepr", into = "u32")]
pub struct Severity(u32);

impl Severity {
    pub const NONE: Severity = Severity(0);
    pub const ERROR: Severity = Severity(1);
    pub const WARN: Severity = Severity(1 << 1);
    pub const INFO: Severity = Severity(1 << 2);
    pub const DEBUG: Severity = Severity(1 << 3);

    /// Error, warn and info; debug stays off
    pub const DEFAULT: Severity = Severity(Self::ERROR.0 | Self::WARN.0 | Self::INFO.0);
    pub const ALL: Severity = Severity(Self::DEFAULT.0 | Self::DEBUG.0);

    /// Build a mask from raw bits, discarding anything outside the four channels
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Severity(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when any bit of `other` is enabled in this mask
    pub fn intersects(self, other: impl Into<Severity>) -> bool {
        self.0 & other.into().0 != 0
    }

    /// Set the bits of `other`
    pub fn insert(&mut self, other: impl Into<Severity>) {
        self.0 |= other.into().0;
    }

    /// Clear exactly the bits of `other`, leaving every other bit alone
    pub fn remove(&mut self, other: impl Into<Severity>) {
        self.0 &= !other.into().0;
    }

    /// Enabled channels in resolver order
    pub fn channels(self) -> impl Iterator<Item = Channel> {
        Channel::ALL
            .into_iter()
            .filter(move |channel| self.intersects(*channel))
    }
}

impl From<Channel> for Severity {
    fn from(channel: Channel) -> Self {
        channel.bit()
    }
}

impl From<Severity> for u32 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

impl BitOr for Severity {
    type Output = Severity;

    fn bitor(self, rhs: Severity) -> Severity {
        Severity(self.0 | rhs.0)
    }
}

impl BitOrAssign for Severity {
    fn bitor_assign(&mut self, rhs: Severity) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Severity {
    type Output = Severity;

    fn bitand(self, rhs: Severity) -> Severity {
        Severity(self.0 & rhs.0)
    }
}

impl BitAndAssign for Severity {
    fn bitand_assign(&mut self, rhs: Severity) {
        self.0 &= rhs.0;
    }
}

impl Not for Severity {
    type Output = Severity;

    fn not(self) -> Severity {
        Severity::from_bits_truncate(!self.0)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        for (i, channel) in self.channels().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(channel.label())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Severity({})", self)
    }
}

impl FromStr for Severity {
    type Err = Error;

    /// Accepts an integer mask (`"7"`) or labels joined by `|` or `,`
    /// (`"error|warn"`). `none`, `default` and `all` are also understood.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidSeverity(s.to_string()));
        }
        let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            // Same range as LOG_LEVEL_DEFAULT; larger values are rejected, not wrapped
            let bits = trimmed
                .parse::<i32>()
                .map_err(|_| Error::InvalidSeverity(s.to_string()))?;
            return Ok(Severity::from_bits_truncate(bits as u32));
        }

        let mut severity = Severity::NONE;
        for part in trimmed.split(['|', ',']).map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "" => return Err(Error::InvalidSeverity(s.to_string())),
                "none" => {}
                "default" => severity |= Severity::DEFAULT,
                "all" => severity |= Severity::ALL,
                _ => {
                    let channel = part
                        .parse::<Channel>()
                        .map_err(|_| Error::InvalidSeverity(s.to_string()))?;
                    severity.insert(channel);
                }
            }
        }
        Ok(severity)
    }
}

/// Config files may spell a mask as an integer or as a list of channels
#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityRepr {
    Bits(i32),
    Channels(Vec<Channel>),
}

impl From<SeverityRepr> for Severity {
    fn from(repr: SeverityRepr) -> Self {
        match repr {
            SeverityRepr::Bits(bits) => Severity::from_bits_truncate(bits as u32),
            SeverityRepr::Channels(channels) => channels
                .into_iter()
                .fold(Severity::NONE, |mask, channel| mask | channel.bit()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_are_distinct_powers_of_two() {
        assert_eq!(Severity::ERROR.bits(), 1);
        assert_eq!(Severity::WARN.bits(), 2);
        assert_eq!(Severity::INFO.bits(), 4);
        assert_eq!(Severity::DEBUG.bits(), 8);
        assert_eq!(Severity::ALL.bits(), 15);
    }

    #[test]
    fn test_default_excludes_debug() {
        assert!(Severity::DEFAULT.intersects(Channel::Error));
        assert!(Severity::DEFAULT.intersects(Channel::Warn));
        assert!(Severity::DEFAULT.intersects(Channel::Info));
        assert!(!Severity::DEFAULT.intersects(Channel::Debug));
    }

    #[test]
    fn test_remove_clears_only_one_bit() {
        let mut mask = Severity::ALL;
        mask.remove(Channel::Warn);
        assert_eq!(mask, Severity::ERROR | Severity::INFO | Severity::DEBUG);

        // Removing an absent bit is a no-op
        mask.remove(Channel::Warn);
        assert_eq!(mask, Severity::ERROR | Severity::INFO | Severity::DEBUG);
    }

    #[test]
    fn test_truncates_unknown_bits() {
        assert_eq!(Severity::from_bits_truncate(0xff), Severity::ALL);
        assert_eq!(Severity::from_bits_truncate(0x10), Severity::NONE);
        assert_eq!((!Severity::ERROR).bits(), 14);
    }

    #[test]
    fn test_display() {
        assert_eq!(Severity::NONE.to_string(), "NONE");
        assert_eq!(Severity::DEFAULT.to_string(), "ERROR|WARN|INFO");
        assert_eq!(format!("{:?}", Severity::DEBUG), "Severity(DEBUG)");
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!("7".parse::<Severity>().unwrap(), Severity::DEFAULT);
        assert_eq!("-1".parse::<Severity>().unwrap(), Severity::ALL);
        assert_eq!(
            "error|Debug".parse::<Severity>().unwrap(),
            Severity::ERROR | Severity::DEBUG
        );
        assert_eq!(
            "warn, info".parse::<Severity>().unwrap(),
            Severity::WARN | Severity::INFO
        );
        assert_eq!("none".parse::<Severity>().unwrap(), Severity::NONE);
        assert!("".parse::<Severity>().is_err());
        assert!("error|".parse::<Severity>().is_err());
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_integers() {
        for raw in ["4294967297", "2147483648", "-2147483649", "99999999999999999999"] {
            assert!(
                matches!(raw.parse::<Severity>(), Err(Error::InvalidSeverity(_))),
                "value {:?}",
                raw
            );
        }
        assert_eq!("2147483647".parse::<Severity>().unwrap(), Severity::ALL);
        assert_eq!("+4".parse::<Severity>().unwrap(), Severity::INFO);
    }

    #[test]
    fn test_parse_channel() {
        assert_eq!("warn".parse::<Channel>().unwrap(), Channel::Warn);
        assert_eq!("DEBUG".parse::<Channel>().unwrap(), Channel::Debug);
        assert!(matches!(
            "trace".parse::<Channel>(),
            Err(Error::InvalidChannel(_))
        ));
    }

    #[test]
    fn test_deserialize_forms() {
        #[derive(Deserialize)]
        struct Holder {
            severity: Severity,
        }

        let from_bits: Holder = toml::from_str("severity = 9").unwrap();
        assert_eq!(from_bits.severity, Severity::ERROR | Severity::DEBUG);

        let from_list: Holder = toml::from_str(r#"severity = ["warn", "INFO"]"#).unwrap();
        assert_eq!(from_list.severity, Severity::WARN | Severity::INFO);

        let negative: Holder = toml::from_str("severity = -1").unwrap();
        assert_eq!(negative.severity, Severity::ALL);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_integers() {
        #[derive(Deserialize)]
        struct Holder {
            #[allow(dead_code)]
            severity: Severity,
        }

        assert!(toml::from_str::<Holder>("severity = 4294967304").is_err());
        assert!(toml::from_str::<Holder>("severity = 2147483648").is_err());
    }
}
