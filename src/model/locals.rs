//! Per-request context bag.

use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};

/// Mutable caller state threaded through every stage of one request.
///
/// Cloning yields another handle to the same bag. The caller creates it;
/// the engine only passes it along.
#[derive(Debug, Clone, Default)]
pub struct Locals {
    inner: Arc<RwLock<Map<String, Value>>>,
}

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.read().expect("locals lock poisoned").get(key).cloned()
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.inner
            .write()
            .expect("locals lock poisoned")
            .insert(key.into(), value)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.write().expect("locals lock poisoned").remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().expect("locals lock poisoned").contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("locals lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.inner.read().expect("locals lock poisoned").clone()
    }
}
