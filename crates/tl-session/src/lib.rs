//! Session state machine and turn pipeline for Taleloom.
//!
//! A [`GameSession`] owns the current [`SessionState`] and the story
//! [`Transcript`](tl_core::Transcript). The player's two intents, starting a
//! story and choosing an action, each hand out a [`TurnTicket`]; the ticket is
//! run through [`run_turn`] (scene text, then illustration) and the outcome is
//! fed back with [`GameSession::complete`].

pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use pipeline::{TurnTicket, run_turn};
pub use session::GameSession;
pub use state::{LoadingStage, SessionState, StateKind};
