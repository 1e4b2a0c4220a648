//! Metrics collection.
//!
//! # Metrics
//! - `invocations_total` (counter): invocations by op, outcome
//! - `invocation_duration_seconds` (histogram): settled calls by op
//! - `slow_invocations_total` (counter): slow-call diagnostics by op
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the embedder installs an exporter
//! - Without a recorder every call is a no-op

use std::time::Duration;

use crate::resilience::OperationKind;

/// Record the outcome of one invocation.
pub fn record_invocation(op: OperationKind, outcome: &'static str, elapsed: Duration) {
    metrics::counter!("invocations_total", "op" => op.as_str(), "outcome" => outcome).increment(1);
    metrics::histogram!("invocation_duration_seconds", "op" => op.as_str()).record(elapsed.as_secs_f64());
}

/// Record that a slow-call diagnostic fired.
pub fn record_slow_invocation(op: OperationKind) {
    metrics::counter!("slow_invocations_total", "op" => op.as_str()).increment(1);
}
