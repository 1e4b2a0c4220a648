//! Shared collaborators for invocation tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::Value;
use tokio::time::{sleep, Instant};
use tracing::Level;

use model_invoker::config::EngineConfig;
use model_invoker::model::{BoxError, ModelError, ModelResult, RenderModel};
use model_invoker::observability::InvocationLog;
use model_invoker::storage::Storage;
use model_invoker::timing::RenderTimes;
use model_invoker::upgrade::{Upgrade, UpgradeStep};
use model_invoker::{Engine, Locals, MemoryStorage, Model};

/// One captured diagnostic.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub meta: Option<Value>,
}

/// Logging collaborator that keeps everything it is given.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLog {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl InvocationLog for RecordingLog {
    fn log(&self, level: Level, message: &str, meta: Option<&Value>) {
        self.entries.lock().unwrap().push(LogEntry {
            level,
            message: message.to_string(),
            meta: meta.cloned(),
        });
    }
}

/// Storage that waits before answering.
pub struct DelayedStorage {
    pub inner: MemoryStorage,
    pub delay: Duration,
}

impl Storage for DelayedStorage {
    fn get<'a>(&'a self, uri: &'a str) -> BoxFuture<'a, Result<Value, BoxError>> {
        Box::pin(async move {
            sleep(self.delay).await;
            self.inner.get(uri).await
        })
    }
}

/// Identity upgrade that waits before answering.
pub struct DelayedUpgrade {
    pub delay: Duration,
}

impl Upgrade for DelayedUpgrade {
    fn init(&self, _uri: &str, _locals: &Locals) -> UpgradeStep {
        let delay = self.delay;
        Box::new(move |data: Value| -> BoxFuture<'static, Result<Value, BoxError>> {
            Box::pin(async move {
                sleep(delay).await;
                Ok(data)
            })
        })
    }
}

/// A sub-step the scripted model reports into its render times.
#[derive(Debug, Clone)]
pub struct SubStep {
    pub label: String,
    pub delay: Duration,
    pub data: Option<Value>,
}

/// Model whose save and render wait, then answer with a fixed output.
pub struct ScriptedModel {
    pub delay: Duration,
    pub output: Result<Value, String>,
    pub sub_steps: Vec<SubStep>,
    pub started: AtomicUsize,
    pub completed: AtomicUsize,
}

impl ScriptedModel {
    pub fn new(delay_ms: u64, output: Value) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            output: Ok(output),
            sub_steps: Vec::new(),
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    pub fn failing(delay_ms: u64, message: &str) -> Self {
        Self {
            output: Err(message.to_string()),
            ..Self::new(delay_ms, Value::Null)
        }
    }

    pub fn with_sub_step(mut self, label: &str, delay_ms: u64, data: Option<Value>) -> Self {
        self.sub_steps.push(SubStep {
            label: label.to_string(),
            delay: Duration::from_millis(delay_ms),
            data,
        });
        self
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    async fn run(&self, times: Option<&RenderTimes>) -> ModelResult {
        self.started.fetch_add(1, Ordering::SeqCst);

        for step in &self.sub_steps {
            let start = Instant::now();
            sleep(step.delay).await;
            if let Some(times) = times {
                times.record(step.label.clone(), start.elapsed(), step.data.clone());
            }
        }

        sleep(self.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);

        self.output.clone().map_err(|msg| ModelError::failed(msg))
    }
}

impl Model for ScriptedModel {
    fn save<'a>(&'a self, _uri: &'a str, _data: Value, _locals: &'a Locals) -> BoxFuture<'a, ModelResult> {
        Box::pin(self.run(None))
    }

    fn render<'a>(
        &'a self,
        _uri: &'a str,
        _data: Value,
        _locals: &'a Locals,
        times: &'a RenderTimes,
    ) -> BoxFuture<'a, ModelResult> {
        Box::pin(self.run(Some(times)))
    }
}

/// Model that renders the upgraded data unchanged.
pub struct EchoModel;

impl Model for EchoModel {
    fn render<'a>(
        &'a self,
        _uri: &'a str,
        data: Value,
        _locals: &'a Locals,
        _times: &'a RenderTimes,
    ) -> BoxFuture<'a, ModelResult> {
        Box::pin(async move { Ok(data) })
    }
}

/// Post-render hook that wraps data as `{"wrapped": data, "uri": uri}`.
pub struct WrapHook {
    pub delay: Duration,
}

impl RenderModel for WrapHook {
    fn render<'a>(&'a self, uri: &'a str, data: Value, _locals: &'a Locals) -> BoxFuture<'a, ModelResult> {
        Box::pin(async move {
            sleep(self.delay).await;
            Ok(serde_json::json!({ "wrapped": data, "uri": uri }))
        })
    }
}

/// Post-render hook that always returns a fixed value.
pub struct ConstHook(pub Value);

impl RenderModel for ConstHook {
    fn render<'a>(&'a self, _uri: &'a str, _data: Value, _locals: &'a Locals) -> BoxFuture<'a, ModelResult> {
        let value = self.0.clone();
        Box::pin(async move { Ok(value) })
    }
}

/// Engine with the given timeout base and a recording logger.
pub fn engine_with(base_ms: u64, storage: Arc<dyn Storage>) -> (Engine, Arc<RecordingLog>) {
    let mut config = EngineConfig::default();
    config.timeouts.base_ms = base_ms;

    let log = Arc::new(RecordingLog::default());
    let engine = Engine::new(&config, storage).unwrap().with_log(log.clone());
    (engine, log)
}

/// Storage holding a single value, answering after `delay_ms`.
pub fn storage_with(uri: &str, value: Value, delay_ms: u64) -> Arc<DelayedStorage> {
    let inner = MemoryStorage::new();
    inner.put(uri, value);
    Arc::new(DelayedStorage {
        inner,
        delay: Duration::from_millis(delay_ms),
    })
}
