//! Invocation error taxonomy.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::model::{BoxError, ModelError, Operation};
use crate::resilience::OperationKind;

/// A stage or final result had the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `save` resolved to something other than an object.
    #[error("Unable to save {uri}: Data from model.save must be an object!")]
    SaveNotObject { uri: String },

    /// The render pipeline produced something other than an object.
    #[error("Component model must return object, not {found}: {uri}")]
    RenderNotObject { uri: String, found: &'static str },

    /// The data about to be handed back to the client is not an object.
    #[error("Client: Invalid data type for component at {uri} of {found}")]
    ClientData { uri: String, found: &'static str },

    /// The model lacks the operation this call path needs.
    #[error("Unable to {operation} {uri}: model does not implement {operation}")]
    MissingOperation { uri: String, operation: Operation },
}

/// The guarded region did not settle before its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutError {
    pub kind: OperationKind,
    pub limit: Duration,
    pub uri: String,
}

impl fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.limit.as_millis();
        match self.kind {
            OperationKind::Put => write!(f, "Module PUT exceeded {}ms: {}", ms, self.uri),
            OperationKind::Get => write!(f, "Model GET exceeded {}ms: {}", ms, self.uri),
        }
    }
}

impl std::error::Error for TimeoutError {}

/// Coarse classification of an invocation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Timeout,
    Upstream,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Upstream => "upstream",
        }
    }
}

/// Failure of a get or put invocation.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    /// Storage, upgrade or model failure, passed through as raised.
    #[error(transparent)]
    Upstream(BoxError),
}

impl InvocationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InvocationError::Validation(_) => ErrorKind::Validation,
            InvocationError::Timeout(_) => ErrorKind::Timeout,
            InvocationError::Upstream(_) => ErrorKind::Upstream,
        }
    }

    /// Classify a model failure raised while working on `uri`.
    pub(crate) fn from_model(err: ModelError, uri: &str) -> Self {
        match err {
            ModelError::Unsupported(operation) => ValidationError::MissingOperation {
                uri: uri.to_string(),
                operation,
            }
            .into(),
            ModelError::Failed(source) => InvocationError::Upstream(source),
        }
    }
}
