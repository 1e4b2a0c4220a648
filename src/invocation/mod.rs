//! Invocation subsystem.
//!
//! # Data Flow
//! ```text
//! put(model, uri, data, locals):
//!     → race_deadline(base × 5, save → object check → serialize)
//!     → InvocationResult | Validation | Timeout | Upstream
//!     → slow put warning on success past half the limit
//!
//! get(model, hook, mode, uri, locals):
//!     Render:    race_deadline(base × 2, fetch → upgrade → render → object check)
//!                → slow get breakdown on success past half the limit
//!     FetchOnly: fetch → upgrade
//!     → optional RenderModel hook
//!     → client-facing object check
//! ```
//!
//! # Design Decisions
//! - No retries; every failure short-circuits the remaining stages
//! - Upstream failures are passed through unwrapped
//! - Diagnostics never fire on the timeout or validation paths

pub mod engine;
pub mod error;
pub mod get;
pub mod put;

pub use engine::Engine;
pub use error::{ErrorKind, InvocationError, TimeoutError, ValidationError};
pub use get::GetMode;
pub use put::{InvocationResult, InvocationType};
