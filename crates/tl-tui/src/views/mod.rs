//! The four screens, one per session state.
//!
//! Views render a snapshot and translate keys into [`Intent`]s. They never
//! change the session themselves.

pub mod error;
pub mod loading;
pub mod playing;
pub mod start;

/// What a view asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Begin a story from this prompt.
    Start(String),
    /// Continue the story with this action.
    Choose(String),
    /// Throw the story away and go back to the start screen.
    Restart,
}
