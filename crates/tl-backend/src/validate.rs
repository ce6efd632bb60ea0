//! Shape validation for scene payloads.
//!
//! The text model is asked for structured output, but its reply is still
//! untrusted: it must parse as an object with a string `story`, a string
//! `imagePrompt`, and a `choices` array of at most four strings.

use serde_json::Value;
use tl_core::{MAX_CHOICES, Scene};

use crate::error::{BackendError, BackendResult};

/// Parse and validate the JSON text of a scene reply.
pub fn parse_scene(text: &str) -> BackendResult<Scene> {
    let invalid = |detail: String| {
        BackendError::Generation(format!(
            "invalid scene data structure received from API: {detail}"
        ))
    };

    let value: Value = serde_json::from_str(strip_code_fence(text.trim()))
        .map_err(|err| invalid(err.to_string()))?;
    // Serde would also accept a bare `[story, imagePrompt, choices]` array.
    if !value.is_object() {
        return Err(invalid("expected a JSON object".to_string()));
    }
    let scene: Scene = serde_json::from_value(value).map_err(|err| invalid(err.to_string()))?;

    if scene.choices.len() > MAX_CHOICES {
        return Err(invalid(format!(
            "{} choices (at most {MAX_CHOICES})",
            scene.choices.len()
        )));
    }

    Ok(scene)
}

/// Remove a surrounding Markdown code fence, which some models add even in
/// JSON mode.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = rest.strip_prefix("json").unwrap_or(rest);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_scene() {
        let scene = parse_scene(
            r#"{"story":"Rain hammers the neon.","imagePrompt":"noir city","choices":["Enter the bar","Check the alley"]}"#,
        )
        .unwrap();
        assert_eq!(scene.image_prompt, "noir city");
        assert_eq!(scene.choices, ["Enter the bar", "Check the alley"]);
    }

    #[test]
    fn empty_choices_are_valid() {
        let scene = parse_scene(r#"{"story":"Fin.","imagePrompt":"sunset","choices":[]}"#).unwrap();
        assert!(scene.is_ending());
    }

    #[test]
    fn surrounding_whitespace_and_fence() {
        let text = "\n```json\n{\"story\":\"s\",\"imagePrompt\":\"p\",\"choices\":[\"a\"]}\n```\n";
        assert_eq!(parse_scene(text).unwrap().choices, ["a"]);
    }

    #[test]
    fn not_json() {
        let err = parse_scene("Once upon a time").unwrap_err();
        assert!(matches!(err, BackendError::Generation(_)));
        assert!(err.to_string().contains("invalid scene data structure"));
    }

    #[test]
    fn missing_field() {
        let err = parse_scene(r#"{"story":"s","choices":[]}"#).unwrap_err();
        assert!(err.to_string().contains("imagePrompt"));
    }

    #[test]
    fn wrong_field_types() {
        assert!(parse_scene(r#"{"story":1,"imagePrompt":"p","choices":[]}"#).is_err());
        assert!(parse_scene(r#"{"story":"s","imagePrompt":["p"],"choices":[]}"#).is_err());
        assert!(parse_scene(r#"{"story":"s","imagePrompt":"p","choices":"go"}"#).is_err());
        assert!(parse_scene(r#"{"story":"s","imagePrompt":"p","choices":[1,2]}"#).is_err());
    }

    #[test]
    fn not_an_object() {
        assert!(parse_scene(r#"["s","p",[]]"#).is_err());
        assert!(parse_scene("null").is_err());
    }

    #[test]
    fn too_many_choices() {
        let err = parse_scene(
            r#"{"story":"s","imagePrompt":"p","choices":["a","b","c","d","e"]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("5 choices"));
    }
}
