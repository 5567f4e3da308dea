pub mod config;
pub mod logging_system;

pub use config::{Config, ConfigError};
pub use logging_system::{DiagnosticsError, setup_diagnostics};

use crate::domain::{Fields, LogLevel, NativeError, Value};
use crate::parser::{ERROR_FIELD, codec};
use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rask-logger", author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Emit one structured log line
    Emit {
        /// Severity of the line
        #[arg(long, value_enum, default_value_t = LogLevel::Info)]
        level: LogLevel,

        /// Message of the line
        message: String,

        /// Metadata field as key=value; values that parse as JSON are kept as JSON
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },
    /// Decompress a size-guarded metadata value
    Inflate {
        /// Base64 payload as found in a log line
        encoded: String,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Metadata from `key=value` pairs.
///
/// Values are JSON when they parse as JSON, strings otherwise. A plain
/// string under `error` becomes an error instance so it gets classified.
pub fn cli_fields(pairs: impl IntoIterator<Item = (String, String)>) -> Fields {
    pairs
        .into_iter()
        .map(|(key, raw)| {
            let value = match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(json) => Value::from(json),
                Err(_) => Value::from(raw),
            };
            let value = match value {
                Value::String(message) if key == ERROR_FIELD => {
                    Value::from(NativeError::error(message))
                }
                other => other,
            };
            (key, value)
        })
        .collect()
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Emit {
            level,
            message,
            fields,
        } => {
            let config = cli.config.resolve().context("Failed to load configuration")?;
            let logger = config.build_logger().context("Failed to build logger")?;
            tracing::debug!(
                instance_id = logger.instance_id(),
                job_id = logger.job_id(),
                level = %level,
                "Emitting line"
            );
            logger.log(level, &message, cli_fields(fields));
        }
        Command::Inflate { encoded } => {
            let decoded = codec::inflate(&encoded).context("Failed to inflate payload")?;
            println!("{decoded}");
        }
    }
    Ok(())
}
