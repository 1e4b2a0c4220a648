//! Per-call accumulator for render sub-step timings.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::timing::timer;

/// One named sub-step a render stage chose to report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingRecord {
    pub label: String,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(timer::as_millis_f64(*d))
}

/// Handle to the timing records of a single get invocation.
///
/// The engine creates a fresh one immediately before `render` and hands it
/// to the model explicitly. Clones share the same records, so nested work
/// spawned by the model can report into it.
#[derive(Debug, Clone, Default)]
pub struct RenderTimes {
    records: Arc<Mutex<Vec<TimingRecord>>>,
}

impl RenderTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Order is insertion order.
    pub fn record(&self, label: impl Into<String>, duration: Duration, data: Option<Value>) {
        self.records
            .lock()
            .expect("render times mutex poisoned")
            .push(TimingRecord {
                label: label.into(),
                duration,
                data,
            });
    }

    /// Run `fut`, recording how long it took under `label`.
    pub async fn time<F: Future>(&self, label: impl Into<String>, fut: F) -> F::Output {
        let start = timer::start();
        let out = fut.await;
        self.record(label, timer::elapsed_since(start), None);
        out
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("render times mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain every record collected so far.
    pub fn take(&self) -> Vec<TimingRecord> {
        std::mem::take(&mut *self.records.lock().expect("render times mutex poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_in_order_and_take_drains() {
        let times = RenderTimes::new();
        times.record("a", Duration::from_millis(1), None);
        times.clone().record("b", Duration::from_millis(2), Some(json!({"n": 1})));

        assert_eq!(times.len(), 2);
        let records = times.take();
        assert_eq!(records[0].label, "a");
        assert_eq!(records[1].label, "b");
        assert!(times.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_measures_future() {
        let times = RenderTimes::new();
        let out = times
            .time("child", async {
                tokio::time::sleep(Duration::from_millis(15)).await;
                "done"
            })
            .await;

        assert_eq!(out, "done");
        let records = times.take();
        assert_eq!(records[0].duration, Duration::from_millis(15));
    }

    #[test]
    fn test_serializes_duration_as_millis() {
        let record = TimingRecord {
            label: "x".into(),
            duration: Duration::from_micros(42_500),
            data: None,
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"label": "x", "duration": 42.5})
        );
    }
}
