//! Internal diagnostics for the binary.
//!
//! Records emitted by [`crate::Logger`] never go through `tracing`; this
//! subscriber only carries the crate's own diagnostics to stderr.

use std::sync::OnceLock;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the diagnostics filter directives.
pub const DIAGNOSTICS_ENV: &str = "RASK_LOGGER_LOG";
pub const DEFAULT_DIRECTIVE: &str = "warn";

#[derive(Error, Debug, Clone)]
pub enum DiagnosticsError {
    #[error("Invalid filter directive '{directive}': {details}")]
    InvalidFilter { directive: String, details: String },
    #[error("Failed to install diagnostics subscriber: {0}")]
    InitFailed(String),
}

/// Filter from `directive`, or [`DEFAULT_DIRECTIVE`] when unset.
pub fn build_filter(directive: Option<&str>) -> Result<EnvFilter, DiagnosticsError> {
    let directive = directive
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DIRECTIVE);
    EnvFilter::try_new(directive).map_err(|e| DiagnosticsError::InvalidFilter {
        directive: directive.to_string(),
        details: e.to_string(),
    })
}

/// Install the stderr subscriber once; later calls return the first outcome.
pub fn setup_diagnostics() -> Result<(), DiagnosticsError> {
    static INIT: OnceLock<Result<(), DiagnosticsError>> = OnceLock::new();

    INIT.get_or_init(|| {
        let directive = std::env::var(DIAGNOSTICS_ENV).ok();
        let filter = build_filter(directive.as_deref())?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .compact(),
            )
            .try_init()
            .map_err(|e| DiagnosticsError::InitFailed(e.to_string()))
    })
    .clone()
}
