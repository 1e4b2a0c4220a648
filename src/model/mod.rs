//! Caller-supplied business logic.
//!
//! # Responsibilities
//! - Define the `Model` capability surface (`save`, `render`)
//! - Define the optional post-render `RenderModel` hook
//! - Carry per-request caller state (`Locals`)
//!
//! # Design Decisions
//! - Both model operations are optional; an absent one fails with
//!   `ModelError::Unsupported` instead of being looked up at runtime
//! - Futures are boxed so models can be held as `Arc<dyn Model>` and driven
//!   from a spawned task
//! - Render sub-step timings go through an explicit `RenderTimes` argument

pub mod locals;

use std::fmt;

use futures_util::future::{self, BoxFuture};
use serde_json::Value;
use thiserror::Error;

use crate::timing::RenderTimes;

pub use locals::Locals;

/// Boxed error from a collaborator or model.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a model or hook call.
pub type ModelResult = Result<Value, ModelError>;

/// The two model operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Save,
    Render,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Save => f.write_str("save"),
            Operation::Render => f.write_str("render"),
        }
    }
}

/// Failure raised by a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model does not implement this operation.
    #[error("model does not implement {0}")]
    Unsupported(Operation),

    /// The model's own logic failed.
    #[error(transparent)]
    Failed(#[from] BoxError),
}

impl ModelError {
    pub fn failed(err: impl Into<BoxError>) -> Self {
        ModelError::Failed(err.into())
    }
}

/// A unit of business logic for a component or layout.
pub trait Model: Send + Sync {
    fn save<'a>(&'a self, uri: &'a str, data: Value, locals: &'a Locals) -> BoxFuture<'a, ModelResult> {
        let _ = (uri, data, locals);
        Box::pin(future::ready(Err(ModelError::Unsupported(Operation::Save))))
    }

    fn render<'a>(
        &'a self,
        uri: &'a str,
        data: Value,
        locals: &'a Locals,
        times: &'a RenderTimes,
    ) -> BoxFuture<'a, ModelResult> {
        let _ = (uri, data, locals, times);
        Box::pin(future::ready(Err(ModelError::Unsupported(Operation::Render))))
    }
}

/// Post-processing hook applied after fetch/render.
pub trait RenderModel: Send + Sync {
    fn render<'a>(&'a self, uri: &'a str, data: Value, locals: &'a Locals) -> BoxFuture<'a, ModelResult>;
}

/// True for values that count as objects: JSON objects and arrays.
pub fn is_object_shaped(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Name of a value's type, as used in validation messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) | Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Empty;
    impl Model for Empty {}

    #[tokio::test]
    async fn test_default_operations_are_unsupported() {
        let locals = Locals::new();
        let times = RenderTimes::new();

        let err = Empty.save("u", json!({}), &locals).await.unwrap_err();
        assert!(matches!(err, ModelError::Unsupported(Operation::Save)));

        let err = Empty.render("u", json!({}), &locals, &times).await.unwrap_err();
        assert!(matches!(err, ModelError::Unsupported(Operation::Render)));
        assert_eq!(err.to_string(), "model does not implement render");
    }

    #[test]
    fn test_object_shape() {
        assert!(is_object_shaped(&json!({"a": 1})));
        assert!(is_object_shaped(&json!([1, 2])));
        assert!(!is_object_shaped(&json!("oops")));
        assert!(!is_object_shaped(&json!(null)));
        assert!(!is_object_shaped(&json!(3)));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(&json!("s")), "string");
        assert_eq!(type_name(&json!(1.5)), "number");
        assert_eq!(type_name(&json!(true)), "boolean");
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!([])), "object");
    }

    #[test]
    fn test_failed_is_transparent() {
        let err = ModelError::failed("db exploded");
        assert_eq!(err.to_string(), "db exploded");
    }
}
