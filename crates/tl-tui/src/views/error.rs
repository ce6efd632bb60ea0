//! Error screen: the failure message and a way back to the start.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::shared::{button_style, centered_rect};
use crate::views::Intent;

/// Enter or `r` restarts; everything else is ignored.
pub fn handle_key(key: KeyEvent) -> Option<Intent> {
    match key.code {
        KeyCode::Enter | KeyCode::Char('r') => Some(Intent::Restart),
        _ => None,
    }
}

/// Draw the error panel.
pub fn draw(frame: &mut Frame, message: &str, area: Rect) {
    let panel = centered_rect(70, 50, area);

    let lines = vec![
        Line::from(Span::styled(
            "An Error Occurred",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(" Try Again ", button_style())),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, panel);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::test_support::buffer_text;

    #[test]
    fn enter_and_r_restart() {
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(handle_key(enter), Some(Intent::Restart));
        assert_eq!(handle_key(r), Some(Intent::Restart));
        assert_eq!(handle_key(x), None);
    }

    #[test]
    fn shows_title_message_and_button() {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| draw(frame, "HTTP 500", frame.area()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("An Error Occurred"));
        assert!(text.contains("HTTP 500"));
        assert!(text.contains("Try Again"));
    }
}
