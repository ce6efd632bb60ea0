//! In-memory backend for exercising the session without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tl_backend::{BackendError, BackendResult, NarrativeBackend};
use tl_core::{ImageHandle, PlayableScene, Scene};

/// Backend that replays queued results in order and records its calls.
#[derive(Default)]
pub struct ScriptedBackend {
    scenes: Mutex<VecDeque<BackendResult<Scene>>>,
    images: Mutex<VecDeque<BackendResult<ImageHandle>>>,
    scene_calls: Mutex<Vec<(String, String)>>,
    image_prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(self, result: BackendResult<Scene>) -> Self {
        self.scenes.lock().unwrap().push_back(result);
        self
    }

    pub fn image(self, result: BackendResult<ImageHandle>) -> Self {
        self.images.lock().unwrap().push_back(result);
        self
    }

    pub fn image_ok(self) -> Self {
        self.image(Ok(test_image()))
    }

    pub fn scene_calls(&self) -> Vec<(String, String)> {
        self.scene_calls.lock().unwrap().clone()
    }

    pub fn image_prompts(&self) -> Vec<String> {
        self.image_prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl NarrativeBackend for ScriptedBackend {
    async fn generate_scene(&self, action: &str, transcript: &str) -> BackendResult<Scene> {
        self.scene_calls
            .lock()
            .unwrap()
            .push((action.to_string(), transcript.to_string()));
        self.scenes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Generation("script exhausted".into())))
    }

    async fn generate_image(&self, image_prompt: &str) -> BackendResult<ImageHandle> {
        self.image_prompts
            .lock()
            .unwrap()
            .push(image_prompt.to_string());
        self.images
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Image("script exhausted".into())))
    }
}

pub fn test_image() -> ImageHandle {
    ImageHandle::new("image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

pub fn detective_scene() -> Scene {
    Scene::new(
        "Rain hammers the neon signs as you step out of the cab.",
        "noir city",
        ["Enter the bar", "Check the alley"],
    )
}

pub fn ending_scene() -> Scene {
    Scene::new(
        "The case is closed. The city sleeps.",
        "dawn over a wet skyline",
        Vec::<String>::new(),
    )
}

pub fn playable(scene: Scene) -> PlayableScene {
    PlayableScene::new(scene, test_image())
}
