//! GeminiBackend - scene and illustration generation over the Gemini REST API.
//!
//! Scenes come from `:generateContent` with a JSON response schema; images
//! come from the Imagen `:predict` endpoint. The credential travels in the
//! `x-goog-api-key` header so it never shows up in request URLs or errors.

use std::time::Instant;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tl_core::{ImageHandle, Scene};

use crate::NarrativeBackend;
use crate::config::BackendConfig;
use crate::error::{BackendError, BackendResult};
use crate::prompt::{response_schema, scene_prompt};
use crate::validate::parse_scene;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Narrative backend that talks to the Gemini HTTP API.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: Client,
    config: BackendConfig,
}

impl GeminiBackend {
    /// Build a backend from its configuration.
    pub fn new(config: BackendConfig) -> BackendResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| {
            BackendError::Configuration(format!("failed to build HTTP client: {err}"))
        })?;
        Ok(Self { client, config })
    }

    /// Build a backend from the `API_KEY` environment variable with default
    /// settings.
    pub fn try_from_env() -> BackendResult<Self> {
        Self::new(BackendConfig::from_env()?)
    }

    /// The active configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/{model}:{method}", self.config.base_url)
    }

    /// POST a JSON body and decode the JSON reply. Errors come back as plain
    /// messages; callers wrap them into the right [`BackendError`] kind.
    async fn post_json<B, R>(&self, url: String, body: &B) -> Result<R, String>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| format!("request failed: {err}"))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        response
            .json()
            .await
            .map_err(|err| format!("failed to parse response: {err}"))
    }

    fn scene_request(&self, action: &str, transcript: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: scene_prompt(action, transcript),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
                temperature: self.config.temperature,
            },
        }
    }

    fn image_request(&self, image_prompt: &str) -> PredictRequest {
        PredictRequest {
            instances: vec![PredictInstance {
                prompt: image_prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: self.config.aspect_ratio.clone(),
                output_mime_type: self.config.image_mime_type.clone(),
            },
        }
    }
}

#[async_trait]
impl NarrativeBackend for GeminiBackend {
    async fn generate_scene(&self, action: &str, transcript: &str) -> BackendResult<Scene> {
        let model = &self.config.text_model;
        let started = Instant::now();
        tracing::debug!(%model, history_len = transcript.len(), "requesting scene");

        let request = self.scene_request(action, transcript);
        let response: GenerateContentResponse = self
            .post_json(self.endpoint(model, "generateContent"), &request)
            .await
            .map_err(|message| {
                tracing::warn!(%model, error = %message, "scene request failed");
                BackendError::Generation(message)
            })?;

        let scene = parse_scene(&extract_text_response(response)?)?;
        tracing::info!(
            %model,
            choices = scene.choices.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scene generated"
        );
        Ok(scene)
    }

    async fn generate_image(&self, image_prompt: &str) -> BackendResult<ImageHandle> {
        let model = &self.config.image_model;
        let started = Instant::now();
        tracing::debug!(%model, "requesting illustration");

        let request = self.image_request(image_prompt);
        let response: PredictResponse = self
            .post_json(self.endpoint(model, "predict"), &request)
            .await
            .map_err(|message| {
                tracing::warn!(%model, error = %message, "image request failed");
                BackendError::Image(message)
            })?;

        let image = extract_image(response, &self.config.image_mime_type)?;
        tracing::info!(
            %model,
            bytes = image.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "illustration generated"
        );
        Ok(image)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: String,
    output_mime_type: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
    rai_filtered_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> BackendResult<String> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            BackendError::Generation(match block_reason {
                Some(reason) => format!("prompt was blocked ({reason})"),
                None => "API returned no text in the response candidates".to_string(),
            })
        })
}

fn extract_image(response: PredictResponse, default_mime: &str) -> BackendResult<ImageHandle> {
    let Some(prediction) = response.predictions.into_iter().next() else {
        return Err(BackendError::Image("no image was generated".to_string()));
    };

    let Some(encoded) = prediction.bytes_base64_encoded else {
        return Err(BackendError::Image(match prediction.rai_filtered_reason {
            Some(reason) => format!("image was filtered: {reason}"),
            None => "no image was generated".to_string(),
        }));
    };

    let bytes = BASE64_STANDARD
        .decode(encoded.as_bytes())
        .map_err(|err| BackendError::Image(format!("image payload is not valid base64: {err}")))?;
    if bytes.is_empty() {
        return Err(BackendError::Image("no image was generated".to_string()));
    }

    let mime_type = prediction
        .mime_type
        .unwrap_or_else(|| default_mime.to_string());
    Ok(ImageHandle::new(mime_type, bytes))
}

fn map_http_error(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => format!("{status_text}: {msg}"),
                _ => msg,
            }
        })
        .unwrap_or_else(|| body.trim().to_string());

    format!("HTTP {}: {detail}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend() -> GeminiBackend {
        GeminiBackend::new(BackendConfig::new("test-key")).unwrap()
    }

    #[test]
    fn scene_request_shape() {
        let request = backend().scene_request("Enter the bar", "\n\n> start\n\nRain.");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        let text = value["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("\"Enter the bar\""));
        assert!(text.contains("> start\n\nRain."));

        let config = &value["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
        assert!((config["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn image_request_shape() {
        let request = backend().image_request("noir city");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "instances": [{ "prompt": "noir city" }],
                "parameters": {
                    "sampleCount": 1,
                    "aspectRatio": "16:9",
                    "outputMimeType": "image/jpeg"
                }
            })
        );
    }

    #[test]
    fn endpoint_paths() {
        let backend = GeminiBackend::new(
            BackendConfig::new("k").with_base_url("http://localhost:9999/v1beta/models"),
        )
        .unwrap();
        assert_eq!(
            backend.endpoint("gemini-2.5-flash", "generateContent"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn text_from_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"story\":\"s\"}" }] }
            }]
        }))
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "{\"story\":\"s\"}");
    }

    #[test]
    fn no_candidates_is_generation_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        let err = extract_text_response(response).unwrap_err();
        assert!(matches!(err, BackendError::Generation(_)));
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        let err = extract_text_response(response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn image_decoded_from_prediction() {
        let response: PredictResponse = serde_json::from_value(json!({
            "predictions": [{ "bytesBase64Encoded": "aGk=", "mimeType": "image/png" }]
        }))
        .unwrap();
        let image = extract_image(response, "image/jpeg").unwrap();
        assert_eq!(image.bytes(), b"hi");
        assert_eq!(image.mime_type(), "image/png");
    }

    #[test]
    fn image_mime_defaults_to_requested() {
        let response: PredictResponse = serde_json::from_value(json!({
            "predictions": [{ "bytesBase64Encoded": "aGk=" }]
        }))
        .unwrap();
        assert_eq!(
            extract_image(response, "image/jpeg").unwrap().mime_type(),
            "image/jpeg"
        );
    }

    #[test]
    fn zero_images_is_image_error() {
        let response: PredictResponse = serde_json::from_value(json!({})).unwrap();
        let err = extract_image(response, "image/jpeg").unwrap_err();
        assert_eq!(err, BackendError::Image("no image was generated".into()));
    }

    #[test]
    fn filtered_image_reports_reason() {
        let response: PredictResponse = serde_json::from_value(json!({
            "predictions": [{ "raiFilteredReason": "blocked by safety filter" }]
        }))
        .unwrap();
        let err = extract_image(response, "image/jpeg").unwrap_err();
        assert!(err.to_string().contains("blocked by safety filter"));
    }

    #[test]
    fn bad_base64_is_image_error() {
        let response: PredictResponse = serde_json::from_value(json!({
            "predictions": [{ "bytesBase64Encoded": "***" }]
        }))
        .unwrap();
        assert!(matches!(
            extract_image(response, "image/jpeg"),
            Err(BackendError::Image(_))
        ));
    }

    #[test]
    fn http_error_unpacks_google_envelope() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            map_http_error(StatusCode::BAD_REQUEST, body),
            "HTTP 400: INVALID_ARGUMENT: API key not valid."
        );
    }

    #[test]
    fn http_error_falls_back_to_body() {
        assert_eq!(
            map_http_error(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "HTTP 502: upstream down"
        );
    }

    #[tokio::test]
    async fn unreachable_backend_fails_each_call_with_its_kind() {
        let backend = GeminiBackend::new(
            BackendConfig::new("k")
                .with_base_url("http://127.0.0.1:9")
                .with_request_timeout(Some(std::time::Duration::from_secs(5))),
        )
        .unwrap();

        let err = backend.generate_scene("go", "").await.unwrap_err();
        assert!(matches!(err, BackendError::Generation(_)));

        let err = backend.generate_image("noir city").await.unwrap_err();
        assert!(matches!(err, BackendError::Image(_)));
    }
}
