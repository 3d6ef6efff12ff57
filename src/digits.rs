use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of digit positions: HHMMSSCC
pub const DIGIT_COUNT: usize = 8;

/// Highest position the cursor may reach. Centiseconds (6-7) are never edited directly.
pub const MAX_CURSOR: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigitsError {
    #[error("expected 8 digits, got {0}")]
    Length(usize),
    #[error("'{ch}' at position {index} is not a decimal digit")]
    NonDigit { index: usize, ch: char },
}

/// A duration spelled as exactly eight decimal digits (HHMMSSCC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digits([u8; DIGIT_COUNT]);

impl Digits {
    pub const ZERO: Digits = Digits([0; DIGIT_COUNT]);

    /// Five minutes, the duration the widget shows before anything is edited.
    pub const DEFAULT: Digits = Digits([0, 0, 0, 5, 0, 0, 0, 0]);

    pub fn values(&self) -> &[u8; DIGIT_COUNT] {
        &self.0
    }

    /// Two-digit field starting at `start` (0 = hours, 2 = minutes, ...)
    pub fn field(&self, start: usize) -> u64 {
        u64::from(self.0[start]) * 10 + u64::from(self.0[start + 1])
    }

    pub(crate) fn from_values(values: [u8; DIGIT_COUNT]) -> Self {
        debug_assert!(values.iter().all(|v| *v <= 9));
        Self(values)
    }
}

impl Default for Digits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in self.0 {
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl FromStr for Digits {
    type Err = DigitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s.chars().count();
        if count != DIGIT_COUNT {
            return Err(DigitsError::Length(count));
        }

        let mut values = [0u8; DIGIT_COUNT];
        for (index, ch) in s.chars().enumerate() {
            let value = ch
                .to_digit(10)
                .ok_or(DigitsError::NonDigit { index, ch })?;
            values[index] = value as u8;
        }
        Ok(Self(values))
    }
}

impl TryFrom<String> for Digits {
    type Error = DigitsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Digits> for String {
    fn from(d: Digits) -> Self {
        d.to_string()
    }
}

/// Editable digit display with a cursor.
///
/// Edits use shift-register entry: the span `0..=cursor` behaves like a
/// fixed-width register, new digits enter at the cursor and push older
/// digits toward the hours end. Positions after the cursor are untouched.
/// While `locked` (countdown active) every user edit is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitBuffer {
    digits: Digits,
    cursor: usize,
    locked: bool,
}

impl DigitBuffer {
    pub fn new(digits: Digits) -> Self {
        Self {
            digits,
            cursor: MAX_CURSOR,
            locked: false,
        }
    }

    pub fn digits(&self) -> Digits {
        self.digits
    }

    pub fn as_string(&self) -> String {
        self.digits.to_string()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn set_cursor(&mut self, position: usize) {
        if self.locked {
            return;
        }
        self.cursor = position.min(MAX_CURSOR);
    }

    pub fn move_cursor_left(&mut self) {
        self.set_cursor(self.cursor.saturating_sub(1));
    }

    pub fn move_cursor_right(&mut self) {
        self.set_cursor(self.cursor + 1);
    }

    /// Non-digit characters are ignored.
    pub fn apply_digit_key(&mut self, key: char) {
        if self.locked {
            return;
        }
        let Some(value) = key.to_digit(10) else {
            return;
        };

        let mut values = *self.digits.values();
        values[..=self.cursor].rotate_left(1);
        values[self.cursor] = value as u8;
        self.digits = Digits::from_values(values);
    }

    pub fn apply_backspace(&mut self) {
        if self.locked {
            return;
        }

        let mut values = *self.digits.values();
        values[..=self.cursor].rotate_right(1);
        values[0] = 0;
        self.digits = Digits::from_values(values);
    }

    /// Replace the contents wholesale. Bypasses the lock.
    pub fn reset(&mut self, to: Digits) {
        self.digits = to;
    }
}

impl Default for DigitBuffer {
    fn default() -> Self {
        Self::new(Digits::DEFAULT)
    }
}
