//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (base timeout > 0, slow ratio in (0, 1])
//! - Reject unknown log levels
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EngineConfig → Result<(), Vec<ConfigViolation>>

use thiserror::Error;

use crate::config::schema::EngineConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigViolation {
    #[error("timeouts.base_ms must be greater than zero")]
    ZeroBaseTimeout,

    #[error("timeouts.slow_ratio must be in (0, 1], got {0}")]
    SlowRatioOutOfRange(f64),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Check a parsed configuration, collecting every violation.
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<ConfigViolation>> {
    let mut violations = Vec::new();

    if config.timeouts.base_ms == 0 {
        violations.push(ConfigViolation::ZeroBaseTimeout);
    }

    let ratio = config.timeouts.slow_ratio;
    if !(ratio > 0.0 && ratio <= 1.0) {
        violations.push(ConfigViolation::SlowRatioOutOfRange(ratio));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        violations.push(ConfigViolation::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
