//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Engine invocations produce:
//!     → logging.rs (slow-call diagnostics through InvocationLog)
//!     → metrics.rs (outcome counters, duration histograms)
//!     → tracing spans with an invocation ID
//! ```
//!
//! # Design Decisions
//! - Diagnostics are observational only; they never change control flow
//! - The logging sink is injected so callers can capture it

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, InvocationLog, LoggingError, TracingLog};
