use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sevlog_core::resolve::{self, Environment, ProcessEnv};
use sevlog_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sevlog")]
#[command(about = "Leveled logging from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

/// Settings that override the config file
#[derive(Args)]
struct LoggerArgs {
    /// Prefix shown in brackets and used for scoped environment variables
    #[arg(long)]
    prefix: Option<String>,

    /// Requested severity, as an integer mask or labels such as "error|warn"
    #[arg(long, allow_hyphen_values = true)]
    severity: Option<Severity>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a message on one channel
    Emit {
        /// Channel to write on (error, warn, info, debug)
        channel: Channel,

        /// Message words, joined with spaces
        #[arg(required = true)]
        message: Vec<String>,

        #[command(flatten)]
        logger: LoggerArgs,
    },

    /// Show the effective severity after environment overrides
    Resolve {
        #[command(flatten)]
        logger: LoggerArgs,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the environment variables consulted, in lookup order
    Vars {
        #[arg(long)]
        prefix: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize diagnostics
    sevlog_core::logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Emit {
            channel,
            message,
            logger,
        } => {
            let config = load_config(cli.config.as_deref(), &logger)?;
            cmd_emit(&config, channel, &message.join(" "))
        }
        Commands::Resolve { logger, json } => {
            let config = load_config(cli.config.as_deref(), &logger)?;
            cmd_resolve(&config, json)
        }
        Commands::Vars { prefix } => {
            let args = LoggerArgs {
                prefix,
                severity: None,
            };
            let config = load_config(cli.config.as_deref(), &args)?;
            cmd_vars(&config.prefix);
            Ok(())
        }
    }
}

/// Config file first, then command-line flags on top
fn load_config(path: Option<&Path>, args: &LoggerArgs) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(prefix) = &args.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(severity) = args.severity {
        config.severity = severity;
    }
    Ok(config)
}

fn cmd_emit(config: &Config, channel: Channel, message: &str) -> Result<()> {
    install_default(Logger::from_config(config)?)?;

    let logger = default_logger();
    if !logger.channel_enabled(channel) {
        tracing::debug!("{} disabled (mask {}), nothing written", channel, logger.severity());
    }
    logger.try_log(channel, format_args!("{}", message))
}

#[derive(Serialize)]
struct ResolveReport {
    prefix: String,
    requested: u32,
    mask: u32,
    channels: Vec<ChannelReport>,
}

#[derive(Serialize)]
struct ChannelReport {
    channel: &'static str,
    enabled: bool,
    /// Variable that decided this channel, if any
    source: Option<String>,
}

fn cmd_resolve(config: &Config, json: bool) -> Result<()> {
    let env = ProcessEnv;
    let effective = resolve::resolve(&config.prefix, config.severity, &env);

    let report = ResolveReport {
        prefix: config.prefix.clone(),
        requested: config.severity.bits(),
        mask: effective.bits(),
        channels: Channel::ALL
            .into_iter()
            .map(|channel| ChannelReport {
                channel: channel.label(),
                enabled: effective.intersects(channel),
                source: resolve::channel_override(&config.prefix, channel, &env)
                    .map(|(var, _)| var),
            })
            .collect(),
    };

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| Error::Config(format!("Failed to serialize report: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    if !report.prefix.is_empty() {
        println!("prefix: {}", report.prefix);
    }
    println!("mask: {} ({})", report.mask, effective);
    for channel in &report.channels {
        let state = if channel.enabled { "on" } else { "off" };
        match &channel.source {
            Some(var) => println!("{:<5} {:<3} ({})", channel.channel, state, var),
            None => println!("{:<5} {}", channel.channel, state),
        }
    }
    Ok(())
}

fn cmd_vars(prefix: &str) {
    let env = ProcessEnv;
    let mut names = vec![resolve::DEFAULT_VAR.to_string()];
    for channel in Channel::ALL {
        names.extend(resolve::channel_variables(prefix, channel));
    }

    for name in names {
        match env.get(&name) {
            Some(value) => println!("{}={}", name, value),
            None => println!("{} (unset)", name),
        }
    }
}
