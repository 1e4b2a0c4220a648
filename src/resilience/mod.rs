//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Invocation start:
//!     → Engine loads one TimeoutPolicy snapshot
//!     → timeouts.rs (limit = base × coefficient)
//!     → race_deadline (spawned work vs. timer)
//!     → Ok(output) | DeadlineElapsed
//! ```
//!
//! # Design Decisions
//! - A deadline is terminal for that call; there is no retry layer
//! - Abandoned work is detached, never aborted

pub mod timeouts;

pub use timeouts::{race_deadline, DeadlineElapsed, OperationKind, TimeoutPolicy};
