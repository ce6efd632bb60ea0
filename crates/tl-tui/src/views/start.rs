//! Start screen: the prompt form and suggested beginnings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::shared::{TextInput, button_style};
use crate::views::Intent;

/// Canned openings offered under the prompt field.
pub const SUGGESTED_PROMPTS: [&str; 4] = [
    "A lone detective in a rain-slicked cyberpunk city.",
    "A fantasy quest to find a lost dragon's egg.",
    "Surviving on a mysterious, uncharted island after a shipwreck.",
    "Exploring a derelict starship adrift in deep space.",
];

/// State of the start form.
#[derive(Debug, Clone, Default)]
pub struct StartForm {
    /// The prompt being typed.
    pub input: TextInput,
    /// Highlighted suggestion.
    pub selected: usize,
}

impl StartForm {
    /// Handle a key. Emits [`Intent::Start`] on Enter with a non-blank prompt.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('r') {
                self.surprise(&mut rand::rng());
            }
            return None;
        }

        match key.code {
            KeyCode::Enter => {
                if self.input.is_blank() {
                    return None;
                }
                return Some(Intent::Start(self.input.value().to_string()));
            }
            KeyCode::Esc => self.input.clear(),
            KeyCode::Up => {
                self.selected = self
                    .selected
                    .checked_sub(1)
                    .unwrap_or(SUGGESTED_PROMPTS.len() - 1);
            }
            KeyCode::Down => self.selected = (self.selected + 1) % SUGGESTED_PROMPTS.len(),
            KeyCode::Tab => self.input.set(SUGGESTED_PROMPTS[self.selected]),
            _ => {
                self.input.handle_key(key);
            }
        }
        None
    }

    /// Fill the prompt with a random suggestion.
    pub fn surprise<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        let idx = rng.random_range(0..SUGGESTED_PROMPTS.len());
        self.selected = idx;
        self.input.set(SUGGESTED_PROMPTS[idx]);
    }
}

/// Draw the start screen.
pub fn draw(frame: &mut Frame, form: &StartForm, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Padding
            Constraint::Length(2), // Title
            Constraint::Length(2), // Tagline
            Constraint::Length(3), // Prompt
            Constraint::Length(1), // Begin button
            Constraint::Length(1), // Padding
            Constraint::Min(3),    // Suggestions
        ])
        .horizontal_margin(2)
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("Tale", Style::default().fg(Color::White).bold()),
        Span::styled("loom", Style::default().fg(Color::Cyan).bold()),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[1]);

    let tagline = Paragraph::new(
        "Craft your own saga. Describe the adventure you want to begin.",
    )
    .style(Style::default().fg(Color::Gray))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(tagline, chunks[2]);

    let (text, text_style) = if form.input.value().is_empty() {
        (
            "e.g., A sci-fi adventure on a derelict starship...".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (form.input.value().to_string(), Style::default())
    };
    let input = Paragraph::new(Line::from(vec![
        Span::raw("> "),
        Span::styled(text, text_style),
    ]))
    .block(
        Block::default()
            .title(" Your adventure ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(input, chunks[3]);

    // Cursor: left border + "> " prefix
    let cursor_x = chunks[3].x + 1 + 2 + form.input.cursor_column();
    if cursor_x < chunks[3].x + chunks[3].width.saturating_sub(1) {
        frame.set_cursor_position(Position::new(cursor_x, chunks[3].y + 1));
    }

    let begin_style = if form.input.is_blank() {
        Style::default().fg(Color::DarkGray)
    } else {
        button_style()
    };
    let begin = Paragraph::new(Span::styled(" Begin \u{2192} ", begin_style))
        .alignment(Alignment::Right);
    frame.render_widget(begin, chunks[4]);

    let items: Vec<ListItem> = SUGGESTED_PROMPTS
        .iter()
        .map(|p| ListItem::new(Span::raw(format!(" {p}"))))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(" Or choose a starting point (Tab) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default();
    state.select(Some(form.selected));
    frame.render_stateful_widget(list, chunks[6], &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::test_support::buffer_text;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut StartForm, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn enter_with_prompt_starts() {
        let mut form = StartForm::default();
        type_text(&mut form, "A detective in a rain-soaked city");
        assert_eq!(
            form.handle_key(key(KeyCode::Enter)),
            Some(Intent::Start("A detective in a rain-soaked city".into()))
        );
    }

    #[test]
    fn blank_prompt_is_ignored() {
        let mut form = StartForm::default();
        assert_eq!(form.handle_key(key(KeyCode::Enter)), None);
        type_text(&mut form, "   ");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), None);
    }

    #[test]
    fn suggestion_fills_prompt() {
        let mut form = StartForm::default();
        form.handle_key(key(KeyCode::Down));
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.input.value(), SUGGESTED_PROMPTS[1]);

        form.handle_key(key(KeyCode::Up));
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.selected, SUGGESTED_PROMPTS.len() - 1);
    }

    #[test]
    fn surprise_picks_a_suggestion() {
        let mut form = StartForm::default();
        form.surprise(&mut StdRng::seed_from_u64(7));
        assert!(SUGGESTED_PROMPTS.contains(&form.input.value()));
    }

    #[test]
    fn esc_clears() {
        let mut form = StartForm::default();
        type_text(&mut form, "abc");
        form.handle_key(key(KeyCode::Esc));
        assert!(form.input.value().is_empty());
    }

    #[test]
    fn renders_form_and_suggestions() {
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        let form = StartForm::default();
        terminal
            .draw(|frame| draw(frame, &form, frame.area()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Taleloom"));
        assert!(text.contains("Your adventure"));
        assert!(text.contains(SUGGESTED_PROMPTS[0]));
    }
}
