//! Helpers shared by the view and app tests.

use async_trait::async_trait;
use ratatui::buffer::Buffer;
use tl_backend::{BackendError, BackendResult, NarrativeBackend};
use tl_core::{ImageHandle, Scene};

/// Flatten a rendered buffer into newline-separated rows.
pub fn buffer_text(buffer: &Buffer) -> String {
    let width = buffer.area.width.max(1) as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Backend that answers every turn the same way.
pub struct FixedBackend {
    scene: Option<Scene>,
}

impl FixedBackend {
    pub fn scene(scene: Scene) -> Self {
        Self { scene: Some(scene) }
    }

    pub fn failing() -> Self {
        Self { scene: None }
    }
}

#[async_trait]
impl NarrativeBackend for FixedBackend {
    async fn generate_scene(&self, _action: &str, _transcript: &str) -> BackendResult<Scene> {
        self.scene
            .clone()
            .ok_or_else(|| BackendError::Generation("HTTP 500".into()))
    }

    async fn generate_image(&self, _image_prompt: &str) -> BackendResult<ImageHandle> {
        Ok(ImageHandle::new("image/jpeg", vec![0xFF, 0xD8, 0xFF]))
    }
}

pub fn detective_scene() -> Scene {
    Scene::new(
        "Rain hammers the neon signs as you step out of the cab.",
        "noir city",
        ["Enter the bar", "Check the alley"],
    )
}
