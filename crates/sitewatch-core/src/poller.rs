// ── Periodic refresh ──
//
// Two states: `Idle` (no timer) and `Active` (one timer task). Starting
// runs a refresh cycle immediately, then arms the timer. Refresh failures
// never stop the poller; the next tick is the retry.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::dashboard::Dashboard;
use crate::refresh::RefreshOutcome;

/// Poller state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Active,
}

/// Drives [`Dashboard::refresh`] on a fixed cadence.
///
/// At most one timer exists per poller: `start()` on an active poller is a
/// no-op. Dropping the poller cancels its timer.
pub struct Poller {
    dashboard: Dashboard,
    period: Duration,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Poller using the dashboard's configured refresh interval.
    pub fn new(dashboard: Dashboard) -> Self {
        let period = dashboard.config().refresh_interval;
        Self::with_period(dashboard, period)
    }

    /// Poller with an explicit cadence.
    ///
    /// # Panics
    ///
    /// If `period` is zero (tokio intervals cannot tick at zero).
    pub fn with_period(dashboard: Dashboard, period: Duration) -> Self {
        assert!(!period.is_zero(), "poll period must be non-zero");
        Self {
            dashboard,
            period,
            cancel: CancellationToken::new(),
            handle: None,
        }
    }

    pub fn state(&self) -> PollerState {
        match &self.handle {
            Some(handle) if !handle.is_finished() => PollerState::Active,
            _ => PollerState::Idle,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// `Idle → Active`: run one refresh cycle now, then arm the timer.
    ///
    /// Returns the outcome of the immediate cycle, or `None` if the poller
    /// was already active.
    pub async fn start(&mut self) -> Option<RefreshOutcome> {
        if self.state() == PollerState::Active {
            debug!("poller already active");
            return None;
        }

        let outcome = self.dashboard.refresh().await;

        self.cancel = CancellationToken::new();
        self.handle = Some(tokio::spawn(poll_task(
            self.dashboard.clone(),
            self.period,
            self.cancel.clone(),
        )));
        info!(period_secs = self.period.as_secs_f64(), "poller started");
        Some(outcome)
    }

    /// `Active → Idle`: cancel the timer and wait for an in-flight cycle
    /// to finish.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
            info!("poller stopped");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Tick loop. Cycles run one after another inside this task; a tick that
/// comes due while a cycle is still running is delayed, not stacked.
async fn poll_task(dashboard: Dashboard, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let outcome = dashboard.refresh().await;
                if !outcome.is_complete() {
                    debug!(?outcome, "periodic refresh degraded");
                }
            }
        }
    }
}
