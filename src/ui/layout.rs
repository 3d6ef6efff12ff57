use ratatui::layout::Rect;

use crate::digits::DIGIT_COUNT;

pub const PANEL_WIDTH: u16 = 33;
pub const PANEL_HEIGHT: u16 = 9;
pub const DIGIT_WIDTH: u16 = 3;
pub const BUTTON_WIDTH: u16 = 12;

/// Width of the digit row: eight cells plus the ':' ':' '.' separators
pub const DIGIT_ROW_WIDTH: u16 = DIGIT_COUNT as u16 * DIGIT_WIDTH + 3;

/// Screen regions of one rendered frame, shared by drawing and click hit-testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerLayout {
    pub display: Rect,
    pub digits: [Rect; DIGIT_COUNT],
    pub separators: [Rect; 3],
    pub progress: Rect,
    pub action_button: Rect,
    pub reset_button: Rect,
    pub hints: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Digit(usize),
    Display,
    ActionButton,
    ResetButton,
    Outside,
}

impl TimerLayout {
    pub fn new(area: Rect) -> Self {
        let width = PANEL_WIDTH.min(area.width);
        let x = area.x + (area.width - width) / 2;
        let y = area.y + area.height.saturating_sub(PANEL_HEIGHT) / 2;
        let clip = |r: Rect| {
            let r = r.intersection(area);
            if r.is_empty() {
                Rect::default()
            } else {
                r
            }
        };

        let display = clip(Rect::new(x, y, width, 3));
        let row_x = x + width.saturating_sub(DIGIT_ROW_WIDTH) / 2;
        let row_y = y + 1;

        let mut digits = [Rect::default(); DIGIT_COUNT];
        for (i, cell) in digits.iter_mut().enumerate() {
            // one separator after each of the first three fields
            let offset = i as u16 * DIGIT_WIDTH + i as u16 / 2;
            *cell = clip(Rect::new(row_x + offset, row_y, DIGIT_WIDTH, 1));
        }
        let separators = [1u16, 2, 3]
            .map(|field| clip(Rect::new(row_x + field * 2 * DIGIT_WIDTH + field - 1, row_y, 1, 1)));

        let progress = clip(Rect::new(x + 1, y + 3, width.saturating_sub(2), 1));
        let action_button = clip(Rect::new(x + 2, y + 5, BUTTON_WIDTH, 3));
        let reset_button = clip(Rect::new(
            (x + width).saturating_sub(BUTTON_WIDTH + 2),
            y + 5,
            BUTTON_WIDTH,
            3,
        ));
        let hints = clip(Rect::new(area.x, y + 8, area.width, 1));

        Self {
            display,
            digits,
            separators,
            progress,
            action_button,
            reset_button,
            hints,
        }
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Hit {
        let contains = |r: &Rect| {
            column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
        };

        if let Some(position) = self.digits.iter().position(contains) {
            Hit::Digit(position)
        } else if contains(&self.display) {
            Hit::Display
        } else if contains(&self.action_button) {
            Hit::ActionButton
        } else if contains(&self.reset_button) {
            Hit::ResetButton
        } else {
            Hit::Outside
        }
    }
}
