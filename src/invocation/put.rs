//! Save invocation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{Instrument, Level};
use uuid::Uuid;

use crate::invocation::engine::{outcome_label, settle, Engine};
use crate::invocation::error::{InvocationError, ValidationError};
use crate::model::{is_object_shaped, Locals, Model};
use crate::observability::metrics;
use crate::resilience::{race_deadline, OperationKind};
use crate::timing::timer;

/// Kind tag of a put result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationType {
    Put,
}

/// Normalized outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: InvocationType,
    /// JSON serialization of what `save` resolved to.
    pub value: String,
}

impl Engine {
    /// Run `model.save` under the put deadline and wrap its result.
    ///
    /// The save keeps running if the deadline fires first; its late result
    /// is discarded. A "slow put" warning is logged only on success.
    pub async fn put(
        &self,
        model: Arc<dyn Model>,
        uri: &str,
        data: Value,
        locals: &Locals,
    ) -> Result<InvocationResult, InvocationError> {
        let policy = self.timeout_policy();
        let limit = policy.limit(OperationKind::Put);
        let start = timer::start();
        let span = tracing::debug_span!("put", invocation_id = %Uuid::new_v4(), uri);

        let work = {
            let uri = uri.to_string();
            let locals = locals.clone();

            async move {
                let resolved = model
                    .save(&uri, data, &locals)
                    .await
                    .map_err(|e| InvocationError::from_model(e, &uri))?;

                if !is_object_shaped(&resolved) {
                    return Err(ValidationError::SaveNotObject { uri }.into());
                }

                let value = serde_json::to_string(&resolved)
                    .map_err(|e| InvocationError::Upstream(Box::new(e)))?;

                Ok::<_, InvocationError>(InvocationResult {
                    key: uri,
                    kind: InvocationType::Put,
                    value,
                })
            }
            .instrument(span)
        };

        let outcome = settle(race_deadline(limit, work).await, OperationKind::Put, limit, uri);
        let elapsed = timer::elapsed_since(start);

        if outcome.is_ok() && policy.is_slow(OperationKind::Put, elapsed) {
            let ms = timer::as_millis_f64(elapsed);
            self.log.log(Level::WARN, &format!("slow put {} {}ms", uri, ms), None);
            metrics::record_slow_invocation(OperationKind::Put);
        }

        metrics::record_invocation(OperationKind::Put, outcome_label(&outcome), elapsed);
        outcome
    }
}
