//! Narrative backend client for Taleloom.
//!
//! The backend is reached through two operations: [`NarrativeBackend::generate_scene`]
//! turns a player action plus the story so far into a [`Scene`], and
//! [`NarrativeBackend::generate_image`] turns the scene's image prompt into an
//! [`ImageHandle`]. [`GeminiBackend`] implements both over the Gemini REST API.
//! Neither operation keeps state or retries; a failure is returned as is.

pub mod config;
pub mod error;
pub mod gemini;
pub mod prompt;
pub mod validate;

use async_trait::async_trait;
use tl_core::{ImageHandle, Scene};

pub use config::BackendConfig;
pub use error::{BackendError, BackendResult};
pub use gemini::GeminiBackend;

/// The two generative capabilities a story turn needs.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Generate the next scene from the player's action and the rendered
    /// transcript of earlier turns.
    ///
    /// Fails with [`BackendError::Generation`] when the call fails or the
    /// reply does not have the shape of a [`Scene`].
    async fn generate_scene(&self, action: &str, transcript: &str) -> BackendResult<Scene>;

    /// Generate exactly one illustration for an image prompt.
    ///
    /// Fails with [`BackendError::Image`] when the call fails or no image
    /// comes back.
    async fn generate_image(&self, image_prompt: &str) -> BackendResult<ImageHandle>;
}
