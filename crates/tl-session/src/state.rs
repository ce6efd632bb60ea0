//! The four session states.

use std::fmt;

use tl_core::PlayableScene;

/// What the session is doing right now. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for the opening prompt.
    #[default]
    Start,
    /// A turn is in flight.
    Loading {
        /// Progress text for the loading indicator.
        message: String,
    },
    /// A scene is on screen.
    Playing {
        /// The current scene and its illustration.
        scene: PlayableScene,
    },
    /// The last turn failed. Only a restart leaves this state.
    Error {
        /// User-facing description, including the underlying cause.
        message: String,
    },
}

impl SessionState {
    /// The variant without its payload.
    pub fn kind(&self) -> StateKind {
        match self {
            SessionState::Start => StateKind::Start,
            SessionState::Loading { .. } => StateKind::Loading,
            SessionState::Playing { .. } => StateKind::Playing,
            SessionState::Error { .. } => StateKind::Error,
        }
    }

    /// The current scene, when playing.
    pub fn scene(&self) -> Option<&PlayableScene> {
        match self {
            SessionState::Playing { scene } => Some(scene),
            _ => None,
        }
    }
}

/// Payload-free tag of a [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// See [`SessionState::Start`].
    Start,
    /// See [`SessionState::Loading`].
    Loading,
    /// See [`SessionState::Playing`].
    Playing,
    /// See [`SessionState::Error`].
    Error,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateKind::Start => "at the start screen",
            StateKind::Loading => "loading",
            StateKind::Playing => "playing",
            StateKind::Error => "in an error state",
        };
        f.write_str(name)
    }
}

/// Step of the turn pipeline currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingStage {
    /// Waiting for the scene text.
    Narrating,
    /// Waiting for the illustration.
    Illustrating,
}

impl LoadingStage {
    /// Loading indicator text for this stage.
    pub fn message(self) -> &'static str {
        match self {
            LoadingStage::Narrating => "The storyteller is pondering your fate...",
            LoadingStage::Illustrating => "A vision of your world is materializing...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_core::{ImageHandle, Scene};

    #[test]
    fn default_is_start() {
        assert_eq!(SessionState::default().kind(), StateKind::Start);
    }

    #[test]
    fn scene_only_while_playing() {
        let scene = PlayableScene::new(
            Scene::new("s", "p", ["a"]),
            ImageHandle::new("image/jpeg", vec![1]),
        );
        let playing = SessionState::Playing { scene };
        assert_eq!(playing.kind(), StateKind::Playing);
        assert!(playing.scene().is_some());

        let error = SessionState::Error {
            message: "boom".into(),
        };
        assert!(error.scene().is_none());
    }

    #[test]
    fn stage_messages_differ() {
        assert_ne!(
            LoadingStage::Narrating.message(),
            LoadingStage::Illustrating.message()
        );
    }
}
