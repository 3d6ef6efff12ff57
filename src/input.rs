use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::clock::Clock;
use crate::runtime::TimerEvent;
use crate::timer::{FunctionKey, Presenter, Timer};
use crate::ui::{Hit, TimerLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Terminal was resized; the frame needs a full redraw.
    Redraw,
    Quit,
}

/// Feed one runtime event into the timer. `area` is the last drawn frame
/// size, used to resolve mouse clicks.
pub fn dispatch<C: Clock, P: Presenter>(
    timer: &mut Timer<C, P>,
    event: TimerEvent,
    area: Rect,
) -> Control {
    match event {
        TimerEvent::Tick => {
            timer.on_tick();
            Control::Continue
        }
        TimerEvent::Resize => Control::Redraw,
        TimerEvent::Closed => Control::Quit,
        TimerEvent::FocusLost => {
            timer.on_blur();
            Control::Continue
        }
        TimerEvent::Key(key) => on_key(timer, key),
        TimerEvent::Mouse(mouse) => {
            on_mouse(timer, mouse, area);
            Control::Continue
        }
    }
}

fn on_key<C: Clock, P: Presenter>(timer: &mut Timer<C, P>, key: KeyEvent) -> Control {
    match key.code {
        KeyCode::Esc => return Control::Quit,
        // ctrl+c to quit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Control::Quit
        }
        KeyCode::Char('q') => return Control::Quit,
        KeyCode::Char(' ') => timer.on_action_button_press(),
        KeyCode::Char('r') => timer.on_reset_button_press(),
        KeyCode::Char(c) => timer.on_key_press(c),
        KeyCode::Backspace => timer.on_function_key(FunctionKey::Backspace),
        KeyCode::Left => timer.on_function_key(FunctionKey::ArrowLeft),
        KeyCode::Right => timer.on_function_key(FunctionKey::ArrowRight),
        KeyCode::Enter => timer.on_function_key(FunctionKey::Enter),
        _ => {}
    }
    Control::Continue
}

fn on_mouse<C: Clock, P: Presenter>(timer: &mut Timer<C, P>, mouse: MouseEvent, area: Rect) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    match TimerLayout::new(area).hit_test(mouse.column, mouse.row) {
        Hit::Digit(position) => timer.on_digit_click(position),
        Hit::Display => {}
        Hit::ActionButton => timer.on_action_button_press(),
        Hit::ResetButton => timer.on_reset_button_press(),
        Hit::Outside => timer.on_blur(),
    }
}
