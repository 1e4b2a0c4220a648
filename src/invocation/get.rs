//! Get invocation: fetch → upgrade → render → optional post-process.
//!
//! # State Machine (render mode)
//! ```text
//! INIT → FETCHING → UPGRADING → RENDERING → DONE
//!                                         ↘ TIMED_OUT | VALIDATION_FAILED | UPSTREAM_FAILED
//! DONE → POST_PROCESSING (if a RenderModel is given) → DONE | UPSTREAM_FAILED
//! ```
//!
//! Only fetch, upgrade and render sit inside the deadline. Post-processing
//! and the final client-facing check run after it, in both modes.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::time::Instant;
use tracing::{Instrument, Level};
use uuid::Uuid;

use crate::invocation::engine::{outcome_label, settle, Engine};
use crate::invocation::error::{InvocationError, ValidationError};
use crate::model::{is_object_shaped, type_name, Locals, Model, RenderModel};
use crate::observability::metrics;
use crate::resilience::{race_deadline, OperationKind};
use crate::timing::{format_render_times, timer, RenderTimes, StageTimes, TimingRecord};

/// Whether a get runs the model's `render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetMode {
    /// Fetch, upgrade and render under the get deadline, with diagnostics.
    Render,
    /// Fetch and upgrade only; no deadline, no diagnostics.
    FetchOnly,
}

/// Output of the deadline-guarded part of a render-mode get.
struct Rendered {
    data: Value,
    stages: StageTimes,
    records: Vec<TimingRecord>,
}

impl Engine {
    /// Fetch `uri`, upgrade it and, in render mode, render it through `model`.
    ///
    /// `render_model`, when given, post-processes the result outside the
    /// deadline. Whatever is returned is guaranteed to be object-shaped.
    pub async fn get(
        &self,
        model: Arc<dyn Model>,
        render_model: Option<&dyn RenderModel>,
        mode: GetMode,
        uri: &str,
        locals: &Locals,
    ) -> Result<Value, InvocationError> {
        let data = match mode {
            GetMode::Render => self.render_pipeline(model, uri, locals).await?,
            GetMode::FetchOnly => self.fetch_upgraded(uri, locals).await?,
        };

        let data = match render_model {
            Some(hook) => hook
                .render(uri, data, locals)
                .await
                .map_err(|e| InvocationError::from_model(e, uri))?,
            None => data,
        };

        if !is_object_shaped(&data) {
            return Err(ValidationError::ClientData {
                uri: uri.to_string(),
                found: type_name(&data),
            }
            .into());
        }

        Ok(data)
    }

    async fn fetch_upgraded(&self, uri: &str, locals: &Locals) -> Result<Value, InvocationError> {
        let raw = self.storage.get(uri).await.map_err(InvocationError::Upstream)?;
        let step = self.upgrade.init(uri, locals);
        step(raw).await.map_err(InvocationError::Upstream)
    }

    async fn render_pipeline(
        &self,
        model: Arc<dyn Model>,
        uri: &str,
        locals: &Locals,
    ) -> Result<Value, InvocationError> {
        let policy = self.timeout_policy();
        let limit = policy.limit(OperationKind::Get);
        let start = timer::start();
        let span = tracing::debug_span!("get", invocation_id = %Uuid::new_v4(), uri);

        let work = {
            let storage = self.storage.clone();
            let upgrade = self.upgrade.clone();
            let uri = uri.to_string();
            let locals = locals.clone();

            async move {
                let pipeline_start = Instant::now();
                let raw = storage.get(&uri).await.map_err(InvocationError::Upstream)?;
                let after_fetch = Instant::now();

                let step = upgrade.init(&uri, &locals);
                let upgraded = step(raw).await.map_err(InvocationError::Upstream)?;
                let after_upgrade = Instant::now();

                // Fresh accumulator per render pass.
                let times = RenderTimes::new();
                let rendered = model
                    .render(&uri, upgraded, &locals, &times)
                    .await
                    .map_err(|e| InvocationError::from_model(e, &uri))?;
                let after_render = Instant::now();

                if !is_object_shaped(&rendered) {
                    return Err(ValidationError::RenderNotObject {
                        found: type_name(&rendered),
                        uri,
                    }
                    .into());
                }

                Ok::<_, InvocationError>(Rendered {
                    data: rendered,
                    stages: StageTimes::from_marks(pipeline_start, after_fetch, after_upgrade, after_render),
                    records: times.take(),
                })
            }
            .instrument(span)
        };

        let outcome = settle(race_deadline(limit, work).await, OperationKind::Get, limit, uri);
        let elapsed = timer::elapsed_since(start);
        metrics::record_invocation(OperationKind::Get, outcome_label(&outcome), elapsed);

        let rendered = outcome?;
        if policy.is_slow(OperationKind::Get, elapsed) {
            self.report_slow_get(uri, &rendered, elapsed);
        }

        Ok(rendered.data)
    }

    fn report_slow_get(&self, uri: &str, rendered: &Rendered, elapsed: Duration) {
        let meta = slow_get_meta(uri, &rendered.stages, &rendered.records, elapsed);
        self.log.log(Level::ERROR, &format!("slow get {}", uri), Some(&meta));
        metrics::record_slow_invocation(OperationKind::Get);
    }
}

/// Structured payload of a "slow get" diagnostic. Durations are in
/// nanoseconds.
fn slow_get_meta(uri: &str, stages: &StageTimes, records: &[TimingRecord], elapsed: Duration) -> Value {
    json!({
        "http": {
            "url": uri,
        },
        "stages": {
            "get": timer::as_nanos_u64(stages.fetch),
            "upgrade": timer::as_nanos_u64(stages.upgrade),
            "render": timer::as_nanos_u64(stages.render),
            "detailed_render_times": format_render_times(records),
        },
        "duration": timer::as_nanos_u64(elapsed),
    })
}
