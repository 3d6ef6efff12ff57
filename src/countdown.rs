use std::time::{Duration, Instant};

use crate::alert::AlertScheduler;
use crate::codec::{from_centiseconds, to_centiseconds};
use crate::digits::{DigitBuffer, Digits};
use crate::schedule::TaskSlot;

/// Default redraw cadence while running; fine enough for centiseconds.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum CountdownState {
    #[default]
    Idle,
    Running,
    Expired,
}

/// One start-to-reset lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSession {
    /// First start of the session; pauses count as elapsed time.
    pub start_instant: Instant,
    pub end_instant: Instant,
    pub initial_snapshot: Digits,
}

impl TimerSession {
    /// Fraction of the session elapsed at `now`, clamped to [0, 1].
    pub fn elapsed_fraction(&self, now: Instant) -> f64 {
        let total = self.end_instant.saturating_duration_since(self.start_instant);
        if total.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_instant);
        (elapsed.as_secs_f64() / total.as_secs_f64()).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining_centis: u64 },
    Expired,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub tick: Option<TickOutcome>,
    pub alert: bool,
}

impl PollOutcome {
    pub fn is_quiet(&self) -> bool {
        self.tick.is_none() && !self.alert
    }
}

/// Owns the countdown state machine and everything it mutates: the digit
/// buffer, the session, the tick task and the alert scheduler.
///
/// Remaining time is always recomputed from the absolute end instant, so
/// late or skipped ticks never accumulate drift.
#[derive(Debug)]
pub struct CountdownEngine {
    state: CountdownState,
    buffer: DigitBuffer,
    session: Option<TimerSession>,
    last_snapshot: Digits,
    /// Set on the first start after a reset; later starts reuse `last_snapshot`.
    snapshot_held: bool,
    tick_task: TaskSlot,
    tick_interval: Duration,
    alerts: AlertScheduler,
    progress: f64,
}

impl CountdownEngine {
    pub fn new(initial: Digits, tick_interval: Duration) -> Self {
        Self {
            state: CountdownState::Idle,
            buffer: DigitBuffer::new(initial),
            session: None,
            last_snapshot: initial,
            snapshot_held: false,
            tick_task: TaskSlot::default(),
            tick_interval,
            alerts: AlertScheduler::new(),
            progress: 0.0,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn buffer(&self) -> &DigitBuffer {
        &self.buffer
    }

    /// Edits through this are ignored unless the engine is idle.
    pub fn buffer_mut(&mut self) -> &mut DigitBuffer {
        &mut self.buffer
    }

    pub fn session(&self) -> Option<&TimerSession> {
        self.session.as_ref()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_alerting(&self) -> bool {
        self.alerts.is_active()
    }

    pub fn alerts(&self) -> &AlertScheduler {
        &self.alerts
    }

    pub fn is_ticking(&self) -> bool {
        self.tick_task.is_active()
    }

    /// True while an end instant is in force (Running or Expired).
    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            CountdownState::Running | CountdownState::Expired
        )
    }

    pub fn start(&mut self, now: Instant) {
        if self.state != CountdownState::Idle {
            return;
        }

        let digits = self.buffer.digits();
        let duration = Duration::from_millis(to_centiseconds(&digits) * 10);
        let end_instant = now + duration;

        match self.session.as_mut() {
            Some(session) => {
                session.end_instant = end_instant;
                log::debug!("resuming countdown with {digits} remaining");
            }
            None => {
                if !self.snapshot_held {
                    self.last_snapshot = digits;
                    self.snapshot_held = true;
                }
                self.session = Some(TimerSession {
                    start_instant: now,
                    end_instant,
                    initial_snapshot: self.last_snapshot,
                });
                self.progress = 0.0;
                log::debug!("starting countdown from {digits}");
            }
        }

        self.tick_task.schedule(now, self.tick_interval);
        self.buffer.set_locked(true);
        self.state = CountdownState::Running;
    }

    /// Recompute remaining time against the end instant. None unless running.
    pub fn tick(&mut self, now: Instant) -> Option<TickOutcome> {
        if self.state != CountdownState::Running {
            return None;
        }
        let session = self.session.as_ref()?;

        let remaining = session.end_instant.saturating_duration_since(now);
        self.progress = self.progress.max(session.elapsed_fraction(now));

        if remaining.is_zero() {
            self.tick_task.cancel();
            self.buffer.reset(Digits::ZERO);
            self.progress = 1.0;
            self.state = CountdownState::Expired;
            self.alerts.start_alerts(now);
            return Some(TickOutcome::Expired);
        }

        let remaining_centis = (remaining.as_millis() / 10) as u64;
        self.buffer.reset(from_centiseconds(remaining_centis));
        Some(TickOutcome::Running { remaining_centis })
    }

    /// Run whichever scheduled work is due at `now`.
    pub fn poll(&mut self, now: Instant) -> PollOutcome {
        let tick = if self.tick_task.poll(now) {
            self.tick(now)
        } else {
            None
        };
        let alert = self.alerts.poll(now);
        PollOutcome { tick, alert }
    }

    /// Manual abort. The buffer keeps whatever was last displayed.
    pub fn stop(&mut self) {
        if self.state != CountdownState::Running {
            return;
        }
        log::debug!("countdown stopped at {}", self.buffer.digits());
        self.tick_task.cancel();
        self.buffer.set_locked(false);
        self.state = CountdownState::Idle;
    }

    /// Silence an expired countdown. The run window is closed so the next
    /// start measures progress afresh, but the snapshot is held for reset.
    pub fn acknowledge(&mut self) {
        if self.state != CountdownState::Expired {
            return;
        }
        self.alerts.stop_alerts();
        self.session = None;
        self.progress = 0.0;
        self.buffer.set_locked(false);
        self.state = CountdownState::Idle;
    }

    pub fn reset(&mut self) {
        self.tick_task.cancel();
        self.alerts.stop_alerts();
        if self.session.take().is_some() || self.snapshot_held {
            log::debug!("session cleared, restoring {}", self.last_snapshot);
        }
        self.snapshot_held = false;
        self.buffer.reset(self.last_snapshot);
        self.buffer.set_locked(false);
        self.progress = 0.0;
        self.state = CountdownState::Idle;
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new(Digits::DEFAULT, DEFAULT_TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn engine(s: &str) -> CountdownEngine {
        CountdownEngine::new(s.parse().unwrap(), DEFAULT_TICK_INTERVAL)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_five_second_countdown_expires_exactly() {
        let t0 = Instant::now();
        let mut e = engine("00000500");
        e.start(t0);
        assert_eq!(e.state(), CountdownState::Running);

        assert_matches!(e.tick(t0 + ms(5000)), Some(TickOutcome::Expired));
        assert_eq!(e.state(), CountdownState::Expired);
        assert_eq!(e.buffer().as_string(), "00000000");
        assert_eq!(e.progress(), 1.0);
        assert!(e.is_alerting());
        assert!(!e.is_ticking());
    }

    #[test]
    fn test_tick_republishes_remaining_time() {
        let t0 = Instant::now();
        let mut e = engine("00000500");
        e.start(t0);

        assert_matches!(
            e.tick(t0 + ms(1234)),
            Some(TickOutcome::Running {
                remaining_centis: 376
            })
        );
        assert_eq!(e.buffer().as_string(), "00000376");
    }

    #[test]
    fn test_remaining_centis_are_floored() {
        let t0 = Instant::now();
        let mut e = engine("00000100");
        e.start(t0);
        e.tick(t0 + ms(1));
        assert_eq!(e.buffer().as_string(), "00000099");
        e.tick(t0 + ms(995));
        assert_eq!(e.buffer().as_string(), "00000000");
        assert_eq!(e.state(), CountdownState::Running);
    }

    #[test]
    fn test_poll_ticks_on_cadence() {
        let t0 = Instant::now();
        let mut e = engine("00000100");
        e.start(t0);

        assert!(e.poll(t0 + ms(10)).is_quiet());
        assert_matches!(
            e.poll(t0 + ms(50)).tick,
            Some(TickOutcome::Running { remaining_centis: 95 })
        );
        assert_matches!(e.poll(t0 + ms(1000)).tick, Some(TickOutcome::Expired));
        assert!(!e.poll(t0 + ms(1500)).alert);
        assert!(e.poll(t0 + ms(2000)).alert);
    }

    #[test]
    fn test_progress_is_monotonic_and_clamped() {
        let t0 = Instant::now();
        let mut e = engine("00000200");
        e.start(t0);

        let mut last = 0.0;
        for step in 1..=50 {
            e.tick(t0 + ms(step * 50));
            assert!(e.progress() >= last);
            last = e.progress();
        }
        assert_eq!(e.progress(), 1.0);

        let session = e.session().unwrap();
        assert_eq!(session.elapsed_fraction(t0 + ms(1000)), 0.5);
        assert_eq!(session.elapsed_fraction(t0 + ms(9000)), 1.0);
    }

    #[test]
    fn test_zero_duration_expires_on_first_tick() {
        let t0 = Instant::now();
        let mut e = engine("00000000");
        e.start(t0);
        assert_matches!(e.tick(t0), Some(TickOutcome::Expired));
        assert_eq!(e.progress(), 1.0);
    }

    #[test]
    fn test_stop_keeps_buffer_and_unlocks() {
        let t0 = Instant::now();
        let mut e = engine("00000500");
        e.start(t0);
        e.tick(t0 + ms(2000));
        e.stop();

        assert_eq!(e.state(), CountdownState::Idle);
        assert!(!e.is_running());
        assert!(!e.is_ticking());
        assert_eq!(e.buffer().as_string(), "00000300");

        e.buffer_mut().apply_digit_key('1');
        assert_eq!(e.buffer().as_string(), "00003100");
    }

    #[test]
    fn test_restart_does_not_resnapshot() {
        let t0 = Instant::now();
        let mut e = engine("00000500");
        e.start(t0);
        e.tick(t0 + ms(2000));
        e.stop();

        e.start(t0 + ms(4000));
        let session = e.session().unwrap();
        assert_eq!(session.initial_snapshot.to_string(), "00000500");
        assert_eq!(session.start_instant, t0);
        assert_eq!(session.end_instant, t0 + ms(7000));

        e.reset();
        assert_eq!(e.buffer().as_string(), "00000500");
        assert!(e.session().is_none());
    }

    #[test]
    fn test_resume_keeps_progress_monotonic() {
        let t0 = Instant::now();
        let mut e = engine("00000400");
        e.start(t0);
        e.tick(t0 + ms(1000));
        let before = e.progress();
        e.stop();

        e.start(t0 + ms(3000));
        e.tick(t0 + ms(3050));
        assert!(e.progress() >= before);
    }

    #[test]
    fn test_edits_ignored_while_running_and_expired() {
        let t0 = Instant::now();
        let mut e = engine("00000100");
        e.start(t0);
        e.buffer_mut().apply_digit_key('9');
        e.buffer_mut().set_cursor(0);
        assert_eq!(e.buffer().as_string(), "00000100");

        e.tick(t0 + ms(1000));
        assert!(e.is_running());
        e.buffer_mut().apply_backspace();
        assert_eq!(e.buffer().as_string(), "00000000");
    }

    #[test]
    fn test_acknowledge_silences_and_returns_to_idle() {
        let t0 = Instant::now();
        let mut e = engine("00000100");
        e.start(t0);
        e.tick(t0 + ms(1000));
        e.acknowledge();

        assert_eq!(e.state(), CountdownState::Idle);
        assert!(!e.is_alerting());
        assert!(!e.poll(t0 + ms(5000)).alert);
        assert!(e.session().is_none());
        assert_eq!(e.progress(), 0.0);

        e.reset();
        assert_eq!(e.buffer().as_string(), "00000100");
    }

    #[test]
    fn test_run_after_acknowledge_measures_progress_afresh() {
        let t0 = Instant::now();
        let mut e = engine("00000100");
        e.start(t0);
        e.tick(t0 + ms(1000));
        e.acknowledge();

        for c in "1000".chars() {
            e.buffer_mut().apply_digit_key(c);
        }
        assert_eq!(e.buffer().as_string(), "00001000");

        let t1 = t0 + ms(3000);
        e.start(t1);
        let session = e.session().unwrap();
        assert_eq!(session.start_instant, t1);
        assert_eq!(session.end_instant, t1 + ms(10_000));
        assert_eq!(session.initial_snapshot.to_string(), "00000100");

        e.tick(t1 + ms(100));
        assert_eq!(e.state(), CountdownState::Running);
        assert!(e.progress() < 0.05, "progress {}", e.progress());

        e.reset();
        assert_eq!(e.buffer().as_string(), "00000100");
    }

    #[test]
    fn test_reset_while_expired_stops_alerts() {
        let t0 = Instant::now();
        let mut e = engine("00000100");
        e.buffer_mut().apply_digit_key('2');
        e.start(t0);
        e.tick(t0 + ms(60_000));
        e.reset();

        assert_eq!(e.state(), CountdownState::Idle);
        assert!(!e.is_alerting());
        assert_eq!(e.progress(), 0.0);
        assert_eq!(e.buffer().as_string(), "00001200");
    }

    #[test]
    fn test_reset_without_session_is_idempotent() {
        let mut e = engine("00050000");
        e.buffer_mut().apply_digit_key('3');
        e.reset();
        assert_eq!(e.buffer().as_string(), "00050000");
        e.reset();
        assert_eq!(e.buffer().as_string(), "00050000");
        assert_eq!(e.state(), CountdownState::Idle);
    }

    #[test]
    fn test_start_is_noop_unless_idle() {
        let t0 = Instant::now();
        let mut e = engine("00000500");
        e.start(t0);
        e.start(t0 + ms(1000));
        assert_eq!(e.session().unwrap().end_instant, t0 + ms(5000));

        e.stop();
        e.stop();
        e.acknowledge();
        assert_eq!(e.state(), CountdownState::Idle);
        assert!(e.tick(t0 + ms(2000)).is_none());
    }
}
