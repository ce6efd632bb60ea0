//! Top-level application state: the session, the backend, and view state.
//!
//! The session lives on the UI thread. Turn pipelines run as tasks on the
//! tokio runtime and report back over a channel that the event loop drains
//! between frames.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tl_backend::{BackendResult, NarrativeBackend};
use tl_core::PlayableScene;
use tl_session::{GameSession, LoadingStage, SessionState, TurnTicket, run_turn};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::views::playing::PlayingView;
use crate::views::start::StartForm;
use crate::views::{Intent, error};

/// A message from a running turn pipeline.
#[derive(Debug)]
pub enum TurnUpdate {
    /// The pipeline moved on to another stage.
    Progress {
        /// Turn the update belongs to.
        epoch: u64,
        /// Stage now running.
        stage: LoadingStage,
    },
    /// The pipeline finished.
    Finished {
        /// Turn the update belongs to.
        epoch: u64,
        /// Scene with illustration, or the first failure.
        outcome: BackendResult<PlayableScene>,
    },
}

/// Main application state for the TUI.
pub struct TuiApp {
    /// The story session.
    pub session: GameSession,
    /// Start screen form.
    pub start_form: StartForm,
    /// Story screen selection and scroll.
    pub playing: PlayingView,
    /// Whether to show the help popup.
    pub show_help: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Animation counter, advanced once per loop iteration.
    pub tick: u64,

    backend: Arc<dyn NarrativeBackend>,
    runtime: Handle,
    updates_tx: UnboundedSender<TurnUpdate>,
    updates_rx: UnboundedReceiver<TurnUpdate>,
}

impl TuiApp {
    /// Create an app at the start screen.
    pub fn new(session: GameSession, backend: Arc<dyn NarrativeBackend>, runtime: Handle) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            session,
            start_form: StartForm::default(),
            playing: PlayingView::default(),
            show_help: false,
            should_quit: false,
            tick: 0,
            backend,
            runtime,
            updates_tx,
            updates_rx,
        }
    }

    /// Route a key to the help popup or the view for the current state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::F(1) {
            self.show_help = !self.show_help;
            return;
        }
        if self.show_help {
            if key.code == KeyCode::Esc {
                self.show_help = false;
            }
            return;
        }

        let intent = match self.session.state() {
            SessionState::Start => self.start_form.handle_key(key),
            SessionState::Loading { .. } => None,
            SessionState::Playing { scene } => self.playing.handle_key(key, scene),
            SessionState::Error { .. } => error::handle_key(key),
        };
        if let Some(intent) = intent {
            self.dispatch(intent);
        }
    }

    /// Apply an intent to the session, spawning a turn when one begins.
    pub fn dispatch(&mut self, intent: Intent) {
        let ticket = match intent {
            Intent::Start(prompt) => self.session.start(&prompt),
            Intent::Choose(choice) => self.session.choose(&choice),
            Intent::Restart => {
                self.session.restart();
                self.start_form = StartForm::default();
                self.playing.reset();
                return;
            }
        };

        match ticket {
            Ok(ticket) => self.spawn_turn(ticket),
            Err(e) => tracing::debug!(error = %e, "intent ignored"),
        }
    }

    fn spawn_turn(&self, ticket: TurnTicket) {
        let backend = Arc::clone(&self.backend);
        let tx = self.updates_tx.clone();

        self.runtime.spawn(async move {
            let epoch = ticket.epoch;
            let progress = tx.clone();
            let outcome = run_turn(backend.as_ref(), &ticket, |stage| {
                // Receiver gone means the app is shutting down.
                let _ = progress.send(TurnUpdate::Progress { epoch, stage });
            })
            .await;
            let _ = tx.send(TurnUpdate::Finished { epoch, outcome });
        });
    }

    /// Feed one pipeline update to the session. Stale updates are dropped by
    /// the session itself.
    pub fn apply_update(&mut self, update: TurnUpdate) {
        match update {
            TurnUpdate::Progress { epoch, stage } => {
                self.session.report_progress(epoch, stage);
            }
            TurnUpdate::Finished { epoch, outcome } => {
                if self.session.complete(epoch, outcome) {
                    self.playing.reset();
                }
            }
        }
    }

    /// Apply every update that has arrived since the last call.
    pub fn poll_updates(&mut self) {
        while let Ok(update) = self.updates_rx.try_recv() {
            self.apply_update(update);
        }
    }

    /// Advance the animation counter.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Key hints for the status bar.
    pub fn status_hint(&self) -> &'static str {
        match self.session.state() {
            SessionState::Start => {
                " Enter: begin | \u{2191}\u{2193}: suggestions | Tab: use | Ctrl+R: surprise me | F1: help | Ctrl+C: quit"
            }
            SessionState::Loading { .. } => " Please wait... | Ctrl+C: quit",
            SessionState::Playing { scene } if scene.is_ending() => {
                " Enter: play again | PgUp/PgDn: scroll | F1: help | Ctrl+C: quit"
            }
            SessionState::Playing { .. } => {
                " 1-4: choose | \u{2191}\u{2193} Enter: select | PgUp/PgDn: scroll | r: restart | F1: help | Ctrl+C: quit"
            }
            SessionState::Error { .. } => " Enter: try again | Ctrl+C: quit",
        }
    }
}
