use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uti_core::Ward;

/// Application state for the REST API server
///
/// Wraps the single ward state shared by all request handlers. Handlers take the lock, do their
/// synchronous work and release it before returning.
#[derive(Clone)]
pub struct AppState {
    ward: Arc<Mutex<Ward>>,
}

impl AppState {
    pub fn new(ward: Ward) -> Self {
        Self {
            ward: Arc::new(Mutex::new(ward)),
        }
    }

    /// Locks the ward. A poisoned lock is recovered; ward operations leave no partial state.
    pub fn ward(&self) -> MutexGuard<'_, Ward> {
        self.ward.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Periodic wall-clock refresh. The background task is aborted when this handle is dropped.
pub struct ClockTicker {
    handle: JoinHandle<()>,
}

impl ClockTicker {
    /// Spawns the ticker on the current tokio runtime.
    pub fn spawn(state: AppState, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let now = Utc::now();
                state.ward().tick(now);
                tracing::debug!(%now, "clock tick");
            }
        });
        Self { handle }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
