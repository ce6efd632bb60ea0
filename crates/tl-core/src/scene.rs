use serde::{Deserialize, Serialize};

use crate::image::ImageHandle;

/// Upper bound on the number of choices a scene may offer.
pub const MAX_CHOICES: usize = 4;

/// One narrative unit returned by the backend for a single turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// The story paragraph for this turn.
    pub story: String,
    /// Prompt handed to the image backend to illustrate the scene.
    pub image_prompt: String,
    /// Actions the player can take next. Empty when the story has ended.
    pub choices: Vec<String>,
}

impl Scene {
    /// Create a scene from its parts.
    pub fn new(
        story: impl Into<String>,
        image_prompt: impl Into<String>,
        choices: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            story: story.into(),
            image_prompt: image_prompt.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this scene concludes the story.
    pub fn is_ending(&self) -> bool {
        self.choices.is_empty()
    }
}

/// A scene together with its resolved illustration.
///
/// Only the turn pipeline builds these, once both the text and the image call
/// of the same turn have succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableScene {
    scene: Scene,
    image: ImageHandle,
}

impl PlayableScene {
    /// Pair a scene with its illustration.
    pub fn new(scene: Scene, image: ImageHandle) -> Self {
        Self { scene, image }
    }

    /// The underlying scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The story paragraph.
    pub fn story(&self) -> &str {
        &self.scene.story
    }

    /// The prompt the illustration was generated from.
    pub fn image_prompt(&self) -> &str {
        &self.scene.image_prompt
    }

    /// The offered choices.
    pub fn choices(&self) -> &[String] {
        &self.scene.choices
    }

    /// The illustration.
    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    /// Whether this scene concludes the story.
    pub fn is_ending(&self) -> bool {
        self.scene.is_ending()
    }
}
