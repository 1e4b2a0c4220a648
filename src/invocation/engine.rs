//! Engine construction and shared invocation plumbing.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::task::JoinError;

use crate::config::{validate_config, ConfigError, EngineConfig};
use crate::invocation::error::{InvocationError, TimeoutError};
use crate::observability::{InvocationLog, TracingLog};
use crate::resilience::{DeadlineElapsed, OperationKind, TimeoutPolicy};
use crate::storage::Storage;
use crate::upgrade::{IdentityUpgrade, Upgrade};

/// Runs model `save` and `render` calls under a deadline.
///
/// Collaborators are injected at construction. The timeout policy is the
/// only state that can change after that, and each invocation reads it once.
pub struct Engine {
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) upgrade: Arc<dyn Upgrade>,
    pub(crate) log: Arc<dyn InvocationLog>,
    policy: ArcSwap<TimeoutPolicy>,
}

impl Engine {
    /// Create an engine with identity upgrades and `tracing` diagnostics.
    ///
    /// The configuration is validated here as well, since its fields can be
    /// set directly without going through the loader.
    pub fn new(config: &EngineConfig, storage: Arc<dyn Storage>) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        tracing::debug!(
            base_ms = config.timeouts.base_ms,
            slow_ratio = config.timeouts.slow_ratio,
            "Invocation engine created"
        );

        Ok(Self {
            storage,
            upgrade: Arc::new(IdentityUpgrade),
            log: Arc::new(TracingLog),
            policy: ArcSwap::from_pointee(TimeoutPolicy::from_config(&config.timeouts)),
        })
    }

    pub fn with_upgrade(mut self, upgrade: Arc<dyn Upgrade>) -> Self {
        self.upgrade = upgrade;
        self
    }

    pub fn with_log(mut self, log: Arc<dyn InvocationLog>) -> Self {
        self.log = log;
        self
    }

    /// Current policy snapshot.
    pub fn timeout_policy(&self) -> Arc<TimeoutPolicy> {
        self.policy.load_full()
    }

    pub fn timeout_base(&self) -> Duration {
        self.policy.load().base()
    }

    /// Replace the timeout base. Intended for test harnesses; invocations
    /// already in flight keep the limit they started with. Limits derived
    /// from a very large base saturate rather than overflow.
    pub fn override_timeout_base(&self, base: Duration) {
        self.policy.rcu(|policy| policy.with_base(base));
    }
}

/// Collapse the layers of a deadline race into one invocation result.
pub(crate) fn settle<T>(
    raced: Result<Result<Result<T, InvocationError>, JoinError>, DeadlineElapsed>,
    kind: OperationKind,
    limit: Duration,
    uri: &str,
) -> Result<T, InvocationError> {
    match raced {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join)) => Err(InvocationError::Upstream(
            format!("{} task for {} failed: {}", kind, uri, join).into(),
        )),
        Err(DeadlineElapsed) => {
            tracing::debug!(%kind, uri, limit_ms = limit.as_millis() as u64, "Invocation deadline elapsed");
            Err(TimeoutError {
                kind,
                limit,
                uri: uri.to_string(),
            }
            .into())
        }
    }
}

/// Metrics label for a settled invocation.
pub(crate) fn outcome_label<T>(outcome: &Result<T, InvocationError>) -> &'static str {
    match outcome {
        Ok(_) => "ok",
        Err(e) => e.kind().as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigViolation;
    use crate::invocation::error::ErrorKind;
    use crate::storage::MemoryStorage;

    fn engine() -> Engine {
        Engine::new(&EngineConfig::default(), Arc::new(MemoryStorage::new())).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.timeouts.slow_ratio = -0.5;

        let err = Engine::new(&config, Arc::new(MemoryStorage::new())).err().unwrap();
        match err {
            ConfigError::Validation(v) => assert_eq!(v, vec![ConfigViolation::SlowRatioOutOfRange(-0.5)]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_override_with_huge_base_saturates() {
        let engine = engine();
        engine.override_timeout_base(Duration::from_secs(u64::MAX / 2));
        assert_eq!(engine.timeout_policy().limit(OperationKind::Put), Duration::MAX);
    }

    #[test]
    fn test_override_keeps_old_snapshots() {
        let engine = engine();
        let before = engine.timeout_policy();

        engine.override_timeout_base(Duration::from_millis(10));

        assert_eq!(before.base(), Duration::from_millis(4000));
        assert_eq!(engine.timeout_base(), Duration::from_millis(10));
        assert_eq!(
            engine.timeout_policy().limit(OperationKind::Put),
            Duration::from_millis(50)
        );
    }

    #[test]
    fn test_settle_maps_deadline_to_timeout() {
        let out: Result<(), _> = settle(
            Err(DeadlineElapsed),
            OperationKind::Get,
            Duration::from_millis(8),
            "u",
        );
        let err = out.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(outcome_label::<()>(&Err(err)), "timeout");
    }

    #[test]
    fn test_settle_passes_outcome_through() {
        let out = settle(Ok(Ok(Ok(5))), OperationKind::Put, Duration::from_millis(1), "u");
        assert_eq!(out.unwrap(), 5);
    }
}
