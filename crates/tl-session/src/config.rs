//! Configuration for a story session.

/// Configuration for a story session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// How many of the most recent turns are sent back to the backend as
    /// story history. `None` sends the whole transcript.
    pub max_transcript_turns: Option<usize>,
}

impl SessionConfig {
    /// Limit the story history sent with each request.
    pub fn with_max_transcript_turns(mut self, turns: Option<usize>) -> Self {
        self.max_transcript_turns = turns;
        self
    }
}
