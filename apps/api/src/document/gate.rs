//! Library Loader Gate — waits for the document engine to become available.
//!
//! The engine is built by a background loader task after startup, so an export
//! can arrive before it exists. The gate publishes the load state through a
//! `watch` channel: waiters are woken when the loader reports in, and give up
//! after `WAIT_BUDGET`. `WaitStrategy::Poll` keeps the fixed-interval check for
//! hosts that cannot push a completion signal.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, warn};

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const WAIT_BUDGET: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("document engine did not load within {0:?}")]
    Timeout(Duration),

    #[error("document engine failed to load: {0}")]
    LoadFailed(String),
}

/// Observable readiness, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Loading,
    Ready,
    /// A wait gave up while the load was still pending. The load may still finish.
    TimedOut,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Wake on the loader's completion signal.
    Notify,
    /// Check every `interval`; give up at the first check past the budget.
    Poll { interval: Duration },
}

enum LoadState<T> {
    Loading,
    TimedOut,
    Ready(Arc<T>),
    Failed(String),
}

impl<T> LoadState<T> {
    /// `Some` once the load has settled either way.
    fn settled(&self) -> Option<Result<Arc<T>, GateError>> {
        match self {
            LoadState::Ready(value) => Some(Ok(Arc::clone(value))),
            LoadState::Failed(reason) => Some(Err(GateError::LoadFailed(reason.clone()))),
            LoadState::Loading | LoadState::TimedOut => None,
        }
    }
}

pub struct ReadinessGate<T> {
    state: watch::Sender<LoadState<T>>,
    strategy: WaitStrategy,
    budget: Duration,
}

impl<T> ReadinessGate<T> {
    pub fn new(strategy: WaitStrategy) -> Self {
        Self::with_budget(strategy, WAIT_BUDGET)
    }

    pub fn with_budget(strategy: WaitStrategy, budget: Duration) -> Self {
        let (state, _) = watch::channel(LoadState::Loading);
        Self {
            state,
            strategy,
            budget,
        }
    }

    /// A gate whose capability is available from the start.
    #[cfg(test)]
    pub fn ready(value: T) -> Self {
        let gate = Self::new(WaitStrategy::Notify);
        gate.mark_ready(value);
        gate
    }

    pub fn mark_ready(&self, value: T) {
        self.state.send_replace(LoadState::Ready(Arc::new(value)));
    }

    pub fn mark_failed(&self, reason: impl Into<String>) {
        self.state.send_replace(LoadState::Failed(reason.into()));
    }

    pub fn readiness(&self) -> Readiness {
        match &*self.state.borrow() {
            LoadState::Loading => Readiness::Loading,
            LoadState::TimedOut => Readiness::TimedOut,
            LoadState::Ready(_) => Readiness::Ready,
            LoadState::Failed(_) => Readiness::Failed,
        }
    }

    /// Resolves with the capability, or fails after the wait budget.
    ///
    /// Once ready, returns without touching a timer.
    pub async fn await_ready(&self) -> Result<Arc<T>, GateError> {
        let current = self.state.borrow().settled();
        if let Some(result) = current {
            return result;
        }

        let outcome = match self.strategy {
            WaitStrategy::Notify => self.wait_notified().await,
            WaitStrategy::Poll { interval } => self.wait_polling(interval).await,
        };

        if let Err(GateError::Timeout(_)) = &outcome {
            self.state.send_if_modified(|state| {
                if matches!(state, LoadState::Loading) {
                    *state = LoadState::TimedOut;
                    true
                } else {
                    false
                }
            });
            warn!("Document engine still not ready after {:?}", self.budget);
        }
        outcome
    }

    async fn wait_notified(&self) -> Result<Arc<T>, GateError> {
        let mut rx = self.state.subscribe();
        let wait = async move {
            loop {
                let current = rx.borrow_and_update().settled();
                if let Some(result) = current {
                    return result;
                }
                if rx.changed().await.is_err() {
                    return Err(GateError::LoadFailed("loader dropped".to_string()));
                }
            }
        };

        tokio::time::timeout(self.budget, wait)
            .await
            .unwrap_or(Err(GateError::Timeout(self.budget)))
    }

    async fn wait_polling(&self, interval: Duration) -> Result<Arc<T>, GateError> {
        let started = Instant::now();
        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let current = self.state.borrow().settled();
            if let Some(result) = current {
                return result;
            }
            if started.elapsed() >= self.budget {
                return Err(GateError::Timeout(self.budget));
            }
        }
    }
}

/// Builds the capability off the async scheduler and publishes it into `gate`.
pub async fn load_into<T, F>(gate: Arc<ReadinessGate<T>>, build: F)
where
    T: Send + Sync + 'static,
    F: FnOnce() -> Result<T, String> + Send + 'static,
{
    match tokio::task::spawn_blocking(build).await {
        Ok(Ok(value)) => {
            gate.mark_ready(value);
            info!("Document engine ready");
        }
        Ok(Err(reason)) => {
            warn!("Document engine failed to load: {reason}");
            gate.mark_failed(reason);
        }
        Err(join_error) => {
            warn!("Document engine loader panicked: {join_error}");
            gate.mark_failed(join_error.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLL: WaitStrategy = WaitStrategy::Poll {
        interval: POLL_INTERVAL,
    };

    #[tokio::test(start_paused = true)]
    async fn test_notify_times_out_within_budget() {
        let gate: ReadinessGate<u8> = ReadinessGate::new(WaitStrategy::Notify);
        let started = Instant::now();

        let result = gate.await_ready().await;

        let elapsed = started.elapsed();
        assert_eq!(result.unwrap_err(), GateError::Timeout(WAIT_BUDGET));
        assert!(elapsed >= WAIT_BUDGET);
        assert!(elapsed <= WAIT_BUDGET + POLL_INTERVAL);
        assert_eq!(gate.readiness(), Readiness::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_times_out_within_one_interval_of_budget() {
        let gate: ReadinessGate<u8> = ReadinessGate::new(POLL);
        let started = Instant::now();

        let result = gate.await_ready().await;

        let elapsed = started.elapsed();
        assert!(matches!(result, Err(GateError::Timeout(_))));
        assert!(elapsed >= WAIT_BUDGET);
        assert!(elapsed <= WAIT_BUDGET + POLL_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_gate_resolves_without_waiting() {
        for strategy in [WaitStrategy::Notify, POLL] {
            let gate = ReadinessGate::with_budget(strategy, WAIT_BUDGET);
            gate.mark_ready(7u8);
            let started = Instant::now();

            assert_eq!(*gate.await_ready().await.unwrap(), 7);
            assert_eq!(*gate.await_ready().await.unwrap(), 7);
            assert_eq!(started.elapsed(), Duration::ZERO);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_notify_wakes_when_loader_completes() {
        let gate = Arc::new(ReadinessGate::new(WaitStrategy::Notify));
        let loader = Arc::clone(&gate);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2_500)).await;
            loader.mark_ready("engine");
        });

        let started = Instant::now();
        assert_eq!(*gate.await_ready().await.unwrap(), "engine");
        assert_eq!(started.elapsed(), Duration::from_millis(2_500));
        assert_eq!(gate.readiness(), Readiness::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_sees_load_on_next_tick() {
        let gate = Arc::new(ReadinessGate::new(POLL));
        let loader = Arc::clone(&gate);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            loader.mark_ready(1u8);
        });

        let started = Instant::now();
        gate.await_ready().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_load_fails_waiters_immediately() {
        let gate: ReadinessGate<u8> = ReadinessGate::new(WaitStrategy::Notify);
        gate.mark_failed("bad styles");
        let started = Instant::now();

        assert_eq!(
            gate.await_ready().await.unwrap_err(),
            GateError::LoadFailed("bad styles".to_string())
        );
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(gate.readiness(), Readiness::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_load_after_timeout_becomes_ready() {
        let gate: ReadinessGate<u8> = ReadinessGate::new(WaitStrategy::Notify);
        assert!(gate.await_ready().await.is_err());
        assert_eq!(gate.readiness(), Readiness::TimedOut);

        gate.mark_ready(3);
        assert_eq!(gate.readiness(), Readiness::Ready);
        assert_eq!(*gate.await_ready().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_load_into_publishes_built_value() {
        let gate = Arc::new(ReadinessGate::new(WaitStrategy::Notify));
        load_into(Arc::clone(&gate), || Ok::<_, String>(42u32)).await;
        assert_eq!(*gate.await_ready().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_load_into_records_build_error() {
        let gate: Arc<ReadinessGate<u32>> = Arc::new(ReadinessGate::new(WaitStrategy::Notify));
        load_into(Arc::clone(&gate), || Err("missing font".to_string())).await;
        assert_eq!(gate.readiness(), Readiness::Failed);
    }
}
