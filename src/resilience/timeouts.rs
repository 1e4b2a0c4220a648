//! Timeout enforcement.
//!
//! # Responsibilities
//! - Derive per-operation limits from the configured base
//! - Decide when a successful call counts as slow
//! - Race spawned work against a deadline
//!
//! # Design Decisions
//! - Uses Tokio's timer and task facilities
//! - Work is detached on deadline, never aborted: the spawned task keeps
//!   running and its eventual output is dropped with the `JoinHandle`
//! - Work that settles on the same timer tick as the deadline wins
//! - Limits saturate instead of overflowing
//! - Timeout errors are distinct from other errors

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::task::JoinError;

use crate::config::TimeoutConfig;

/// Limit multiplier for get invocations.
pub const GET_COEFFICIENT: u32 = 2;

/// Limit multiplier for put invocations.
pub const PUT_COEFFICIENT: u32 = 5;

/// The invocation being bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Get,
    Put,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Get => "get",
            OperationKind::Put => "put",
        }
    }

    fn coefficient(&self) -> u32 {
        match self {
            OperationKind::Get => GET_COEFFICIENT,
            OperationKind::Put => PUT_COEFFICIENT,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the timeout settings one invocation runs under.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeoutPolicy {
    base: Duration,
    slow_ratio: f64,
}

impl TimeoutPolicy {
    pub fn new(base: Duration, slow_ratio: f64) -> Self {
        Self { base, slow_ratio }
    }

    pub fn from_config(config: &TimeoutConfig) -> Self {
        Self::new(Duration::from_millis(config.base_ms), config.slow_ratio)
    }

    /// Same policy with a different base.
    pub fn with_base(&self, base: Duration) -> Self {
        Self {
            base,
            slow_ratio: self.slow_ratio,
        }
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    /// Hard deadline for an operation: base × coefficient, saturating at
    /// `Duration::MAX`.
    pub fn limit(&self, kind: OperationKind) -> Duration {
        self.base
            .checked_mul(kind.coefficient())
            .unwrap_or(Duration::MAX)
    }

    /// Elapsed time above which a successful call is reported.
    ///
    /// A ratio that yields no representable duration (negative, NaN, or past
    /// `Duration::MAX`) means nothing is ever reported.
    pub fn slow_threshold(&self, kind: OperationKind) -> Duration {
        Duration::try_from_secs_f64(self.limit(kind).as_secs_f64() * self.slow_ratio)
            .unwrap_or(Duration::MAX)
    }

    pub fn is_slow(&self, kind: OperationKind, elapsed: Duration) -> bool {
        elapsed > self.slow_threshold(kind)
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self::from_config(&TimeoutConfig::default())
    }
}

/// The deadline fired before the raced work settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineElapsed;

/// Spawn `work` and wait for it for at most `limit`.
///
/// On deadline the task is detached, not cancelled. A panic inside the
/// work is returned as the inner `JoinError`.
pub async fn race_deadline<F>(
    limit: Duration,
    work: F,
) -> Result<Result<F::Output, JoinError>, DeadlineElapsed>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let mut handle = tokio::spawn(work);

    tokio::select! {
        joined = &mut handle => Ok(joined),
        _ = tokio::time::sleep(limit) => {
            // Timers due on the same tick fire together; let the work's
            // wakeup run before declaring the deadline.
            tokio::task::yield_now().await;
            (&mut handle).now_or_never().ok_or(DeadlineElapsed)
        }
    }
}
