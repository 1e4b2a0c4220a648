//! Human-readable rendering of timing breakdowns.

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::timing::render_times::TimingRecord;
use crate::timing::timer;

const DATA_INDENT: &str = "    ";

/// Durations of the three render-mode pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimes {
    pub fetch: Duration,
    pub upgrade: Duration,
    pub render: Duration,
}

impl StageTimes {
    /// Build from the instants captured at pipeline start and after each stage.
    pub fn from_marks(start: Instant, after_fetch: Instant, after_upgrade: Instant, after_render: Instant) -> Self {
        Self {
            fetch: after_fetch.saturating_duration_since(start),
            upgrade: after_upgrade.saturating_duration_since(after_fetch),
            render: after_render.saturating_duration_since(after_upgrade),
        }
    }
}

/// Join records as `"  label: Nms"` lines, each followed by its indented data.
pub fn format_render_times(records: &[TimingRecord]) -> String {
    records
        .iter()
        .map(|record| {
            let mut msg = format!("  {}: {}ms", record.label, timer::as_millis_f64(record.duration));

            if let Some(data) = record.data.as_ref().filter(|d| !is_empty_payload(d)) {
                msg.push('\n');
                msg.push_str(&format_timing_data(data));
            }

            msg
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty-print `data` with every line indented by four spaces.
pub fn format_timing_data(data: &Value) -> String {
    let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());

    pretty
        .lines()
        .map(|line| format!("{DATA_INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// Scalars carry no enumerable content and count as empty.
fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => true,
    }
}
