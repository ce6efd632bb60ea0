//! Configuration for the Gemini-backed narrative client.

use std::time::Duration;

use crate::error::{BackendError, BackendResult};

/// Environment variable holding the backend credential.
pub const API_KEY_ENV: &str = "API_KEY";
/// Root of the Gemini REST API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Model used for scene text.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
/// Model used for illustrations.
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";
/// Sampling temperature for scene text.
pub const DEFAULT_TEMPERATURE: f32 = 0.8;
/// Aspect ratio of every illustration.
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";
/// MIME type requested for illustrations.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Settings for [`GeminiBackend`](crate::GeminiBackend).
#[derive(Clone)]
pub struct BackendConfig {
    /// Credential sent with every request.
    pub api_key: String,
    /// Root URL the model paths are appended to.
    pub base_url: String,
    /// Model for scene generation.
    pub text_model: String,
    /// Model for image generation.
    pub image_model: String,
    /// Sampling temperature for scene generation.
    pub temperature: f32,
    /// Aspect ratio requested for illustrations.
    pub aspect_ratio: String,
    /// MIME type requested for illustrations.
    pub image_mime_type: String,
    /// Per-request timeout. `None` waits as long as the backend takes.
    pub request_timeout: Option<Duration>,
}

impl BackendConfig {
    /// Create a configuration with default models for the given credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            image_mime_type: DEFAULT_IMAGE_MIME.to_string(),
            request_timeout: None,
        }
    }

    /// Read the credential from the `API_KEY` environment variable.
    ///
    /// A missing or blank value is a [`BackendError::Configuration`].
    pub fn from_env() -> BackendResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BackendResult<Self> {
        match lookup(API_KEY_ENV) {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(BackendError::Configuration(format!(
                "{API_KEY_ENV} environment variable is not set"
            ))),
        }
    }

    /// Set the root URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the scene model.
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Set the image model.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Set the sampling temperature (clamped to 0.0-2.0).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("temperature", &self.temperature)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("image_mime_type", &self.image_mime_type)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
