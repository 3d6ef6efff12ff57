use std::time::{Duration, Instant};

/// A repeating callback slot for a cooperative, single-threaded loop.
///
/// Nothing runs on its own: the owner polls with the current instant and
/// acts when the task reports it is due. The first firing happens one
/// interval after `start`, like a browser `setInterval`. Intervals missed
/// because the loop stalled coalesce into a single firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    interval: Duration,
    next_due: Instant,
}

impl ScheduledTask {
    pub fn start(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Returns true when the task fires at `now`, and schedules the next slot.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        if self.interval.is_zero() {
            self.next_due = now;
            return true;
        }

        // Skip to the first slot strictly after `now`, keeping the phase.
        let behind = now - self.next_due;
        let skipped = behind.as_nanos() / self.interval.as_nanos() + 1;
        let step = u32::try_from(skipped)
            .ok()
            .and_then(|n| self.interval.checked_mul(n));
        // Too far behind to keep the phase: restart the cadence from `now`.
        self.next_due = step
            .and_then(|step| self.next_due.checked_add(step))
            .unwrap_or(now + self.interval);
        true
    }
}

/// Holds at most one active task. Starting a new one drops the old one;
/// cancelling is idempotent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskSlot(Option<ScheduledTask>);

impl TaskSlot {
    pub fn schedule(&mut self, now: Instant, interval: Duration) {
        self.0 = Some(ScheduledTask::start(now, interval));
    }

    pub fn cancel(&mut self) {
        self.0.take();
    }

    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        self.0.as_mut().is_some_and(|task| task.poll(now))
    }

    pub fn task(&self) -> Option<&ScheduledTask> {
        self.0.as_ref()
    }
}
