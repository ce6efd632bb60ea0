//! Story session management.
//!
//! `GameSession` is the only owner of the session state. Views never touch
//! it directly: they call [`GameSession::start`], [`GameSession::choose`] and
//! [`GameSession::restart`], and whoever drives the turn pipeline reports
//! back through [`GameSession::report_progress`] and
//! [`GameSession::complete`].

use tl_backend::{BackendError, BackendResult, NarrativeBackend};
use tl_core::{PlayableScene, Transcript, Turn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::pipeline::{TurnTicket, run_turn};
use crate::state::{LoadingStage, SessionState, StateKind};

/// A turn that has been handed out but not completed.
#[derive(Debug)]
struct PendingTurn {
    epoch: u64,
    action: String,
}

/// An interactive story session.
#[derive(Debug)]
pub struct GameSession {
    id: Uuid,
    config: SessionConfig,
    state: SessionState,
    transcript: Transcript,
    epoch: u64,
    pending: Option<PendingTurn>,
}

impl GameSession {
    /// Create a session waiting for its opening prompt.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            state: SessionState::Start,
            transcript: Transcript::new(),
            epoch: 0,
            pending: None,
        }
    }

    /// Identifier used in log output.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Turns completed since the last restart.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether the story has reached its end: playing a scene with no choices.
    pub fn is_ending(&self) -> bool {
        self.state.scene().is_some_and(PlayableScene::is_ending)
    }

    /// Begin a story from an opening prompt. Only accepted at the start
    /// screen.
    pub fn start(&mut self, prompt: &str) -> SessionResult<TurnTicket> {
        self.begin_turn(prompt, StateKind::Start, "start a story")
    }

    /// Continue the story with an action. Only accepted while playing.
    ///
    /// The choice is not checked against the offered choices; any non-empty
    /// text is passed on.
    pub fn choose(&mut self, choice: &str) -> SessionResult<TurnTicket> {
        self.begin_turn(choice, StateKind::Playing, "make a choice")
    }

    fn begin_turn(
        &mut self,
        input: &str,
        accepted_in: StateKind,
        intent: &'static str,
    ) -> SessionResult<TurnTicket> {
        let action = input.trim();
        if action.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        let state = self.state.kind();
        if state != accepted_in {
            tracing::debug!(session_id = %self.id, %state, intent, "intent rejected");
            return Err(SessionError::NotAccepting { intent, state });
        }

        self.epoch += 1;
        let ticket = TurnTicket {
            epoch: self.epoch,
            action: action.to_string(),
            history: self.transcript.render(self.config.max_transcript_turns),
        };
        self.pending = Some(PendingTurn {
            epoch: ticket.epoch,
            action: ticket.action.clone(),
        });
        self.state = SessionState::Loading {
            message: LoadingStage::Narrating.message().to_string(),
        };

        tracing::info!(
            session_id = %self.id,
            epoch = ticket.epoch,
            turn = self.transcript.len() + 1,
            "turn started"
        );
        Ok(ticket)
    }

    /// Update the loading message for the turn `epoch`.
    ///
    /// Returns `false` and changes nothing when that turn is no longer the
    /// one in flight.
    pub fn report_progress(&mut self, epoch: u64, stage: LoadingStage) -> bool {
        if !self.is_pending(epoch) {
            return false;
        }
        self.state = SessionState::Loading {
            message: stage.message().to_string(),
        };
        true
    }

    /// Resolve the turn `epoch` with the pipeline's outcome.
    ///
    /// On success the turn is appended to the transcript and its scene
    /// replaces the previous one. On failure the session lands in
    /// [`SessionState::Error`] with the transcript as it was before the
    /// attempt. Outcomes for turns that are no longer in flight, because the
    /// session was restarted meanwhile, are dropped and `false` is returned.
    pub fn complete(&mut self, epoch: u64, outcome: BackendResult<PlayableScene>) -> bool {
        if !self.is_pending(epoch) {
            tracing::debug!(session_id = %self.id, epoch, "dropping stale turn outcome");
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };

        match outcome {
            Ok(scene) => {
                self.transcript
                    .push(Turn::new(pending.action, scene.story()));
                tracing::info!(
                    session_id = %self.id,
                    epoch,
                    turns = self.transcript.len(),
                    choices = scene.choices().len(),
                    "turn completed"
                );
                self.state = SessionState::Playing { scene };
            }
            Err(err) => {
                tracing::warn!(session_id = %self.id, epoch, error = %err, "turn failed");
                self.state = SessionState::Error {
                    message: failure_message(&err),
                };
            }
        }
        true
    }

    /// Return to the start screen, discarding the transcript, the scene, any
    /// error, and any turn still in flight.
    pub fn restart(&mut self) {
        self.epoch += 1;
        self.pending = None;
        self.transcript.clear();
        self.state = SessionState::Start;
        tracing::info!(session_id = %self.id, "session restarted");
    }

    /// Play one whole turn: start or choose, run the pipeline, and complete.
    ///
    /// From the start screen `action` is the opening prompt; while playing it
    /// is the chosen action.
    pub async fn play<B>(&mut self, backend: &B, action: &str) -> SessionResult<&SessionState>
    where
        B: NarrativeBackend + ?Sized,
    {
        let ticket = match self.state.kind() {
            StateKind::Playing => self.choose(action)?,
            _ => self.start(action)?,
        };
        let epoch = ticket.epoch;

        let outcome = run_turn(backend, &ticket, |stage| {
            self.report_progress(epoch, stage);
        })
        .await;
        self.complete(epoch, outcome);

        Ok(&self.state)
    }

    fn is_pending(&self, epoch: u64) -> bool {
        matches!(self.state, SessionState::Loading { .. })
            && self.pending.as_ref().is_some_and(|p| p.epoch == epoch)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// The user-facing message shown when a turn fails.
pub fn failure_message(err: &BackendError) -> String {
    format!(
        "There was a tear in the fabric of reality... ({err}). Please try starting a new adventure."
    )
}
