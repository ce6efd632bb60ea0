//! Terminal setup, teardown, and main event loop.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tl_session::SessionState;

use crate::app::TuiApp;
use crate::views;

/// How long to wait for input before redrawing the spinner and draining
/// turn updates.
const FRAME: Duration = Duration::from_millis(100);

/// Launch the TUI application.
pub fn run(mut app: TuiApp) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Main event loop.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp,
) -> Result<(), String> {
    loop {
        terminal
            .draw(|frame| draw(frame, app))
            .map_err(|e| format!("draw error: {e}"))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(FRAME).map_err(|e| format!("event error: {e}"))? {
            let event = event::read().map_err(|e| format!("event error: {e}"))?;
            if let Event::Key(key) = event
                && key.kind == KeyEventKind::Press
            {
                handle_key(app, key);
            }
        }

        app.poll_updates();
        app.on_tick();
    }
}

fn handle_key(app: &mut TuiApp, key: KeyEvent) {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    app.handle_key(key);
}

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    match app.session.state() {
        SessionState::Start => views::start::draw(frame, &app.start_form, chunks[0]),
        SessionState::Loading { message } => {
            views::loading::draw(frame, message, app.tick, chunks[0])
        }
        SessionState::Playing { scene } => {
            views::playing::draw(frame, &app.playing, scene, chunks[0])
        }
        SessionState::Error { message } => views::error::draw(frame, message, chunks[0]),
    }

    let status = Paragraph::new(app.status_hint())
        .style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(status, chunks[1]);

    if app.show_help {
        crate::shared::draw_help_popup(frame);
    }
}
