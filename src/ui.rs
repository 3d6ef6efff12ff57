pub mod dial;
pub mod layout;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
    Frame,
};

use crate::countdown::CountdownState;
use crate::timer::{ActionLabel, TimerView};

pub use layout::{Hit, TimerLayout};

const SEPARATORS: [&str; 3] = [":", ":", "."];
const HINTS: &str = "0-9 edit · ←/→ move · ⌫ delete · ⏎/space start · (r)eset · (q)uit";

impl Widget for &TimerView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = TimerLayout::new(area);

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let alert_style = Style::default().patch(bold_style).fg(Color::Red);
        let digit_style = match (self.alerting, self.state) {
            (true, _) => alert_style,
            (false, CountdownState::Running) => bold_style,
            // stopped timers are shown dimmed
            (false, _) => Style::default().patch(bold_style).add_modifier(Modifier::DIM),
        };
        let cursor_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::REVERSED);

        let border_style = if self.alerting {
            alert_style
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .render(layout.display, buf);

        for (position, (value, cell)) in self
            .digits
            .values()
            .iter()
            .zip(layout.digits.iter())
            .enumerate()
        {
            let style = if self.cursor == Some(position) {
                cursor_style
            } else {
                digit_style
            };
            Paragraph::new(Span::styled(value.to_string(), style))
                .alignment(Alignment::Center)
                .render(*cell, buf);
        }

        for (sep, cell) in SEPARATORS.iter().zip(layout.separators.iter()) {
            Paragraph::new(Span::styled(*sep, digit_style)).render(*cell, buf);
        }

        Gauge::default()
            .ratio(self.progress.clamp(0.0, 1.0))
            .label(dial::progress_label(self.progress))
            .gauge_style(Style::default().fg(dial::progress_color(self.progress)))
            .render(layout.progress, buf);

        let action_color = match self.action_label {
            ActionLabel::Start => Color::Green,
            ActionLabel::Stop => Color::Yellow,
            ActionLabel::Ok => Color::Red,
        };
        button(&self.action_label.to_string(), action_color).render(layout.action_button, buf);
        button("RESET", Color::Gray).render(layout.reset_button, buf);

        Paragraph::new(Span::styled(
            HINTS,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(layout.hints, buf);
    }
}

fn button(label: &str, color: Color) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    )
}

pub fn ui(view: &TimerView, f: &mut Frame) {
    f.render_widget(view, f.area());
}
