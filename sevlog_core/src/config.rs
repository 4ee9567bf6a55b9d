//! Configuration file support for sevlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/sevlog/config.toml`.
//! Environment overrides are applied on top of it when the logger is built.

use crate::{Error, Result, Severity, Target};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Logger configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub prefix: String,

    #[serde(default = "default_severity")]
    pub severity: Severity,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            severity: default_severity(),
            output: OutputConfig::default(),
        }
    }
}

/// Destinations for the error channel and for the other three
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_error_target")]
    pub error: Target,

    #[serde(default = "default_others_target")]
    pub others: Target,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            error: default_error_target(),
            others: default_others_target(),
        }
    }
}

// Default value functions
fn default_severity() -> Severity {
    Severity::DEFAULT
}

fn default_error_target() -> Target {
    Target::Stderr
}

fn default_others_target() -> Target {
    Target::Stdout
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            Some(config_path) => {
                tracing::info!("No config file found at {:?}, using defaults", config_path);
                Ok(Self::default())
            }
            None => {
                tracing::info!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        let base = dirs::config_dir().or_else(|| {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
        })?;
        Some(base.join("sevlog").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.prefix.is_empty());
        assert_eq!(config.severity, Severity::DEFAULT);
        assert_eq!(config.output.error, Target::Stderr);
        assert_eq!(config.output.others, Target::Stdout);
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            prefix: "svc".into(),
            severity: Severity::ERROR | Severity::DEBUG,
            output: OutputConfig {
                error: Target::Stdout,
                others: Target::File(temp_dir.path().join("app.log")),
            },
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
prefix = "worker"
severity = ["error", "warn"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.prefix, "worker");
        assert_eq!(config.severity, Severity::ERROR | Severity::WARN);
        assert_eq!(config.output, OutputConfig::default()); // default
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "severity = \"loud\"").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Toml(_))));
    }

    #[test]
    fn test_logger_from_config_shares_file_sink() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("app.log");
        let config = Config {
            prefix: "cfg".into(),
            severity: Severity::ALL,
            output: OutputConfig {
                error: Target::File(log_path.clone()),
                others: Target::File(log_path.clone()),
            },
        };

        let logger = crate::Logger::from_config(&config).unwrap();
        assert!(logger
            .sink_for(crate::Channel::Error)
            .same_as(logger.sink_for(crate::Channel::Info)));
        logger.set_severity(Severity::ERROR | Severity::INFO);
        logger.error(format_args!("bad"));
        logger.info(format_args!("fine"));
        logger.debug(format_args!("skipped"));

        let contents = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[ERROR] [cfg] bad"));
        assert!(lines[1].ends_with("[INFO] [cfg] fine"));
    }
}
