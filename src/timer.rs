use std::time::Duration;

use crate::clock::Clock;
use crate::countdown::{CountdownEngine, CountdownState, PollOutcome, TickOutcome};
use crate::digits::{Digits, MAX_CURSOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ActionLabel {
    #[strum(serialize = "START")]
    Start,
    #[strum(serialize = "STOP")]
    Stop,
    #[strum(serialize = "OK")]
    Ok,
}

impl From<CountdownState> for ActionLabel {
    fn from(state: CountdownState) -> Self {
        match state {
            CountdownState::Idle => ActionLabel::Start,
            CountdownState::Running => ActionLabel::Stop,
            CountdownState::Expired => ActionLabel::Ok,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKey {
    Backspace,
    ArrowLeft,
    ArrowRight,
    Enter,
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TimerView {
    pub digits: Digits,
    pub cursor: Option<usize>,
    pub progress: f64,
    pub action_label: ActionLabel,
    pub state: CountdownState,
    pub alerting: bool,
}

impl Default for TimerView {
    fn default() -> Self {
        Self {
            digits: Digits::DEFAULT,
            cursor: Some(MAX_CURSOR),
            progress: 0.0,
            action_label: ActionLabel::Start,
            state: CountdownState::Idle,
            alerting: false,
        }
    }
}

/// Output side of the widget. Called on every state change.
pub trait Presenter {
    fn render(&mut self, view: &TimerView);
    fn emit_alert_signal(&mut self);
    fn clear_alert_signal(&mut self);
}

/// Presenter that keeps the latest frame and a count of pending alert
/// signals, for loops that draw on their own schedule.
#[derive(Debug, Default, Clone)]
pub struct FramePresenter {
    view: TimerView,
    dirty: bool,
    pending_signals: u32,
    alerting: bool,
}

impl FramePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &TimerView {
        &self.view
    }

    pub fn is_alerting(&self) -> bool {
        self.alerting
    }

    /// True once per batch of renders
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn take_signals(&mut self) -> u32 {
        std::mem::take(&mut self.pending_signals)
    }
}

impl Presenter for FramePresenter {
    fn render(&mut self, view: &TimerView) {
        if self.view != *view {
            self.view = view.clone();
            self.dirty = true;
        }
    }

    fn emit_alert_signal(&mut self) {
        self.alerting = true;
        self.pending_signals += 1;
    }

    fn clear_alert_signal(&mut self) {
        self.alerting = false;
        self.pending_signals = 0;
    }
}

/// Countdown widget: turns discrete input events into engine operations and
/// reports every resulting change to its presenter.
#[derive(Debug)]
pub struct Timer<C: Clock, P: Presenter> {
    engine: CountdownEngine,
    clock: C,
    presenter: P,
    focused: bool,
}

impl<C: Clock, P: Presenter> Timer<C, P> {
    pub fn new(initial: Digits, tick_interval: Duration, clock: C, presenter: P) -> Self {
        let mut timer = Self {
            engine: CountdownEngine::new(initial, tick_interval),
            clock,
            presenter,
            focused: true,
        };
        timer.render();
        timer
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn state(&self) -> CountdownState {
        self.engine.state()
    }

    pub fn view(&self) -> TimerView {
        let state = self.engine.state();
        let cursor = (state == CountdownState::Idle && self.focused)
            .then(|| self.engine.buffer().cursor());

        TimerView {
            digits: self.engine.buffer().digits(),
            cursor,
            progress: self.engine.progress(),
            action_label: ActionLabel::from(state),
            state,
            alerting: self.engine.is_alerting(),
        }
    }

    fn render(&mut self) {
        let view = self.view();
        self.presenter.render(&view);
    }

    /// Ignored unless editing is allowed.
    fn editable(&mut self) -> bool {
        if self.engine.is_running() {
            return false;
        }
        self.focused = true;
        true
    }

    pub fn on_digit_click(&mut self, position: usize) {
        if !self.editable() {
            return;
        }
        self.engine.buffer_mut().set_cursor(position);
        self.render();
    }

    pub fn on_key_press(&mut self, key: char) {
        if !key.is_ascii_digit() || !self.editable() {
            return;
        }
        self.engine.buffer_mut().apply_digit_key(key);
        self.render();
    }

    pub fn on_function_key(&mut self, key: FunctionKey) {
        if !self.editable() {
            return;
        }
        match key {
            FunctionKey::Backspace => self.engine.buffer_mut().apply_backspace(),
            FunctionKey::ArrowLeft => self.engine.buffer_mut().move_cursor_left(),
            FunctionKey::ArrowRight => self.engine.buffer_mut().move_cursor_right(),
            FunctionKey::Enter => return self.start(),
        }
        self.render();
    }

    pub fn on_blur(&mut self) {
        self.focused = false;
        self.render();
    }

    pub fn on_action_button_press(&mut self) {
        log::debug!("action pressed while {}", self.engine.state());
        match self.engine.state() {
            CountdownState::Idle => self.start(),
            CountdownState::Running => {
                self.engine.stop();
                self.render();
            }
            CountdownState::Expired => {
                self.engine.acknowledge();
                self.presenter.clear_alert_signal();
                self.render();
            }
        }
    }

    pub fn on_reset_button_press(&mut self) {
        let was_alerting = self.engine.is_alerting();
        self.engine.reset();
        if was_alerting {
            self.presenter.clear_alert_signal();
        }
        self.render();
    }

    /// Drive scheduled work. Call at least as often as the tick interval.
    pub fn on_tick(&mut self) -> PollOutcome {
        let now = self.clock.now();
        let outcome = self.engine.poll(now);
        if outcome.alert {
            self.presenter.emit_alert_signal();
        }
        if outcome.tick.is_some() {
            self.render();
        }
        if let Some(TickOutcome::Expired) = outcome.tick {
            log::info!("countdown finished");
        }
        outcome
    }

    fn start(&mut self) {
        self.engine.start(self.clock.now());
        self.focused = false;
        self.render();
    }
}
