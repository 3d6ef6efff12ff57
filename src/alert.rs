use std::time::{Duration, Instant};

use crate::schedule::TaskSlot;

/// Gap between alert signals once the countdown has expired
pub const ALERT_INTERVAL: Duration = Duration::from_secs(1);

/// Repeats an alert signal until acknowledged.
#[derive(Debug, Default)]
pub struct AlertScheduler {
    task: TaskSlot,
    fired: u64,
}

impl AlertScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_alerts(&mut self, now: Instant) {
        log::info!("countdown expired, alerting every {ALERT_INTERVAL:?}");
        self.fired = 0;
        self.task.schedule(now, ALERT_INTERVAL);
    }

    /// Safe to call when nothing is alerting.
    pub fn stop_alerts(&mut self) {
        if self.task.is_active() {
            log::debug!("alerts stopped after {} signal(s)", self.fired);
        }
        self.task.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.task.is_active()
    }

    /// Number of signals emitted since the last `start_alerts`
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// True when a signal is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self.task.poll(now);
        if due {
            self.fired += 1;
            log::debug!("alert signal #{}", self.fired);
        }
        due
    }
}
