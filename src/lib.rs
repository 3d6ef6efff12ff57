// Library surface for the binary and for headless/integration tests.
pub mod alert;
pub mod app_dirs;
pub mod clock;
pub mod codec;
pub mod config;
pub mod countdown;
pub mod digits;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod schedule;
pub mod timer;
pub mod ui;

pub use countdown::{CountdownEngine, CountdownState};
pub use digits::{DigitBuffer, Digits, DigitsError};
pub use timer::{ActionLabel, FunctionKey, Presenter, Timer, TimerView};
