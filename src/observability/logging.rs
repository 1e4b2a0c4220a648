//! Structured logging.
//!
//! # Responsibilities
//! - Define the logging collaborator slow-call diagnostics are sent to
//! - Forward diagnostics to `tracing` by default
//! - Initialize the subscriber for embedders that want one
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Log level configurable via config and environment (env wins)

use serde_json::Value;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Target used for diagnostics emitted through `TracingLog`.
pub const DIAGNOSTICS_TARGET: &str = "model_invoker::diagnostics";

/// Fire-and-forget sink for invocation diagnostics.
pub trait InvocationLog: Send + Sync {
    fn log(&self, level: Level, message: &str, meta: Option<&Value>);
}

/// Default sink: one `tracing` event per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl InvocationLog for TracingLog {
    fn log(&self, level: Level, message: &str, meta: Option<&Value>) {
        let meta = meta.map(ToString::to_string).unwrap_or_default();

        if level == Level::ERROR {
            tracing::error!(target: DIAGNOSTICS_TARGET, meta = %meta, "{}", message);
        } else if level == Level::WARN {
            tracing::warn!(target: DIAGNOSTICS_TARGET, meta = %meta, "{}", message);
        } else if level == Level::INFO {
            tracing::info!(target: DIAGNOSTICS_TARGET, meta = %meta, "{}", message);
        } else if level == Level::DEBUG {
            tracing::debug!(target: DIAGNOSTICS_TARGET, meta = %meta, "{}", message);
        } else {
            tracing::trace!(target: DIAGNOSTICS_TARGET, meta = %meta, "{}", message);
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to install tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Install a global subscriber. Fails if one is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_ascii_lowercase()));

    let (plain, json) = if config.json {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .try_init()?;

    tracing::debug!(level = %config.log_level, json = config.json, "Logging initialized");
    Ok(())
}
