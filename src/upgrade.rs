//! Data-migration seam applied between fetch and render.

use futures_util::future::{self, BoxFuture};
use serde_json::Value;

use crate::model::{BoxError, Locals};

/// One-shot transform produced for a single get call.
pub type UpgradeStep = Box<dyn FnOnce(Value) -> BoxFuture<'static, Result<Value, BoxError>> + Send>;

/// Factory for per-call upgrade transforms.
pub trait Upgrade: Send + Sync {
    /// Build the transform for `uri`. Called once per get.
    fn init(&self, uri: &str, locals: &Locals) -> UpgradeStep;
}

/// Passes data through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityUpgrade;

impl Upgrade for IdentityUpgrade {
    fn init(&self, _uri: &str, _locals: &Locals) -> UpgradeStep {
        Box::new(|data: Value| -> BoxFuture<'static, Result<Value, BoxError>> { Box::pin(future::ready(Ok(data))) })
    }
}
