//! Key-value retrieval seam.
//!
//! # Responsibilities
//! - Define the `Storage` trait the get pipeline fetches from
//! - Provide an in-process implementation for embedding and tests
//!
//! # Design Decisions
//! - Storage applies no timeout of its own; the engine bounds it
//! - Failures are passed to the caller unwrapped

pub mod memory;

use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::model::BoxError;

pub use memory::MemoryStorage;

/// Source of raw stored values.
pub trait Storage: Send + Sync {
    fn get<'a>(&'a self, uri: &'a str) -> BoxFuture<'a, Result<Value, BoxError>>;
}

/// Errors raised by the bundled storage implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
    NotFound(String),
}
