use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One player action and the story paragraph it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The opening prompt or the chosen action.
    pub action: String,
    /// The story paragraph the backend returned for it.
    pub story: String,
    /// When the turn completed.
    pub at: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with the current time.
    pub fn new(action: impl Into<String>, story: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            story: story.into(),
            at: Utc::now(),
        }
    }
}

/// A chronological, append-only record of the turns played so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turn has been played.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop every turn. Only a restart does this.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Serialize the transcript as the interleaved story history sent with
    /// each backend request.
    ///
    /// Each turn renders as a blank line, `> action`, a blank line, and the
    /// story. With `limit`, only the most recent `limit` turns are rendered.
    pub fn render(&self, limit: Option<usize>) -> String {
        let skip = limit
            .map(|n| self.turns.len().saturating_sub(n))
            .unwrap_or(0);
        let mut out = String::new();
        for turn in &self.turns[skip..] {
            out.push_str("\n\n> ");
            out.push_str(&turn.action);
            out.push_str("\n\n");
            out.push_str(&turn.story);
        }
        out
    }
}
