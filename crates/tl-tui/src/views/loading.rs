//! Loading screen shown while a turn is in flight.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner glyph for an animation tick.
pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

/// Draw the spinner and progress message, centered vertically.
pub fn draw(frame: &mut Frame, message: &str, tick: u64, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    let spinner = Paragraph::new(Span::styled(
        spinner_frame(tick),
        Style::default().fg(Color::Cyan).bold(),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(spinner, chunks[1]);

    let text = Paragraph::new(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Gray).italic(),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(text, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::test_support::buffer_text;

    #[test]
    fn spinner_cycles() {
        assert_eq!(spinner_frame(0), spinner_frame(10));
        assert_ne!(spinner_frame(0), spinner_frame(1));
    }

    #[test]
    fn shows_message() {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|frame| {
                draw(
                    frame,
                    "The storyteller is pondering your fate...",
                    3,
                    frame.area(),
                )
            })
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("The storyteller is pondering your fate..."));
    }
}
