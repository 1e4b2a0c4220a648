//! Elapsed-time helpers.
//!
//! Built on `tokio::time::Instant` so a paused test clock drives them.

use std::time::Duration;

use tokio::time::Instant;

/// Capture a start marker.
#[inline]
pub fn start() -> Instant {
    Instant::now()
}

/// Time elapsed since `start`.
#[inline]
pub fn elapsed_since(start: Instant) -> Duration {
    Instant::now().saturating_duration_since(start)
}

/// Milliseconds with sub-millisecond precision, as printed in diagnostics.
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

/// Nanosecond-equivalent of a duration, as reported in slow-call logs.
pub fn as_nanos_u64(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
