//! In-memory storage backed by a concurrent map.

use std::sync::Arc;

use dashmap::DashMap;
use futures_util::future::{self, BoxFuture};
use serde_json::Value;

use crate::model::BoxError;
use crate::storage::{Storage, StorageError};

/// A thread-safe uri → value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<DashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `uri`, returning the previous value.
    pub fn put(&self, uri: impl Into<String>, value: Value) -> Option<Value> {
        self.inner.insert(uri.into(), value)
    }

    pub fn remove(&self, uri: &str) -> Option<Value> {
        self.inner.remove(uri).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get<'a>(&'a self, uri: &'a str) -> BoxFuture<'a, Result<Value, BoxError>> {
        let found = self
            .inner
            .get(uri)
            .map(|r| r.value().clone())
            .ok_or_else(|| Box::new(StorageError::NotFound(uri.to_string())) as BoxError);

        Box::pin(future::ready(found))
    }
}
