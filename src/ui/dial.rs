use ratatui::style::Color;

/// Eight positions of the sweeping hand, clockwise from twelve o'clock
pub const HAND_FRAMES: [char; 8] = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];

/// Indicator colour once more than half the time has gone
pub const LATE_COLOR: Color = Color::Rgb(0xEC, 0x70, 0x63);
pub const EARLY_COLOR: Color = Color::Cyan;

/// Hand glyph for an elapsed fraction; a full turn is back at twelve.
pub fn hand_glyph(progress: f64) -> char {
    let progress = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let frame = (progress * HAND_FRAMES.len() as f64).floor() as usize % HAND_FRAMES.len();
    HAND_FRAMES[frame]
}

pub fn progress_color(progress: f64) -> Color {
    if progress > 0.5 {
        LATE_COLOR
    } else {
        EARLY_COLOR
    }
}

pub fn progress_label(progress: f64) -> String {
    format!("{} {:>3.0}%", hand_glyph(progress), progress.clamp(0.0, 1.0) * 100.0)
}
