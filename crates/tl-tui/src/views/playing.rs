//! Story screen: illustration, narrative, and choices.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tl_core::PlayableScene;

use crate::shared::button_style;
use crate::views::Intent;

const PAGE: u16 = 5;

/// Selection and scroll position on the story screen.
#[derive(Debug, Clone, Default)]
pub struct PlayingView {
    /// Highlighted choice.
    pub selected: usize,
    /// Story lines scrolled past.
    pub scroll: u16,
}

impl PlayingView {
    /// Forget selection and scroll, for a freshly arrived scene.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Handle a key against the scene on screen.
    pub fn handle_key(&mut self, key: KeyEvent, scene: &PlayableScene) -> Option<Intent> {
        match key.code {
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(PAGE);
                return None;
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(PAGE);
                return None;
            }
            KeyCode::Char('r') => return Some(Intent::Restart),
            _ => {}
        }

        if scene.is_ending() {
            return (key.code == KeyCode::Enter).then_some(Intent::Restart);
        }

        let choices = scene.choices();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.checked_sub(1).unwrap_or(choices.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % choices.len();
            }
            KeyCode::Enter => {
                return choices
                    .get(self.selected)
                    .map(|c| Intent::Choose(c.clone()));
            }
            KeyCode::Char(c) => {
                if let Some(n) = c.to_digit(10)
                    && n >= 1
                    && let Some(choice) = choices.get(n as usize - 1)
                {
                    return Some(Intent::Choose(choice.clone()));
                }
            }
            _ => {}
        }
        None
    }
}

/// Draw the story screen.
pub fn draw(frame: &mut Frame, view: &PlayingView, scene: &PlayableScene, area: Rect) {
    let bottom_height = if scene.is_ending() {
        4
    } else {
        scene.choices().len() as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),             // Illustration
            Constraint::Min(3),                // Story
            Constraint::Length(bottom_height), // Choices or ending
        ])
        .split(area);

    draw_illustration(frame, scene, chunks[0]);
    draw_story(frame, view, scene, chunks[1]);
    if scene.is_ending() {
        draw_ending(frame, chunks[2]);
    } else {
        draw_choices(frame, view, scene, chunks[2]);
    }
}

fn draw_illustration(frame: &mut Frame, scene: &PlayableScene, area: Rect) {
    let image = scene.image();
    let lines = vec![
        Line::from(Span::styled(
            scene.image_prompt().to_string(),
            Style::default().fg(Color::Magenta).italic(),
        )),
        Line::from(Span::styled(
            format!("{} \u{b7} {:.1} KB", image.mime_type(), image.len() as f64 / 1024.0),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Illustration ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(paragraph, area);
}

fn draw_story(frame: &mut Frame, view: &PlayingView, scene: &PlayableScene, area: Rect) {
    let lines: Vec<Line> = scene.story().lines().map(Line::from).collect();

    // Clamp scroll to the wrapped height.
    let inner_width = area.width.saturating_sub(2) as usize;
    let total_wrapped: u16 = lines
        .iter()
        .map(|l| {
            if inner_width == 0 {
                1
            } else {
                l.width().max(1).div_ceil(inner_width) as u16
            }
        })
        .sum();
    let max_scroll = total_wrapped.saturating_sub(area.height.saturating_sub(2));
    let scroll = view.scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Story ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn draw_choices(frame: &mut Frame, view: &PlayingView, scene: &PlayableScene, area: Rect) {
    let lines: Vec<Line> = scene
        .choices()
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let label = format!(" [{}] {choice} ", i + 1);
            if i == view.selected {
                Line::from(Span::styled(label, button_style()))
            } else {
                Line::from(Span::styled(label, Style::default().fg(Color::Cyan)))
            }
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" What do you do? ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(paragraph, area);
}

fn draw_ending(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "The End",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(Span::styled(" Play Again ", button_style())),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
