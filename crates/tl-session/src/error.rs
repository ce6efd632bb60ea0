//! Error types for the session state machine.

use thiserror::Error;

use crate::state::StateKind;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Reasons an intent is turned away by the state machine.
///
/// Backend failures are not session errors: they end the turn and land the
/// session in [`SessionState::Error`](crate::SessionState::Error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The prompt or choice was empty after trimming.
    #[error("input is empty")]
    EmptyInput,

    /// The intent is not valid in the current state.
    #[error("cannot {intent} while the session is {state}")]
    NotAccepting {
        /// What was attempted.
        intent: &'static str,
        /// The state the session was in.
        state: StateKind,
    },
}
