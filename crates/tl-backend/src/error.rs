//! Error types for the narrative backend.

use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised while talking to the generative backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The text call failed or returned something that is not a scene.
    #[error("failed to generate the next part of the adventure: {0}")]
    Generation(String),

    /// The image call failed or returned no image.
    #[error("failed to create the visual for this scene: {0}")]
    Image(String),

    /// The backend cannot be used as configured, e.g. a missing credential.
    #[error("configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_cause() {
        let err = BackendError::Generation("HTTP 503".into());
        assert_eq!(
            err.to_string(),
            "failed to generate the next part of the adventure: HTTP 503"
        );
        let err = BackendError::Image("no image was generated".into());
        assert!(err.to_string().ends_with("no image was generated"));
    }
}
