//! Scene prompt composition and the structured-output schema.

use serde_json::{Value, json};
use tl_core::MAX_CHOICES;

/// Instruction block that opens every scene request.
pub const STORYTELLER_PREAMBLE: &str = "You are a master storyteller for a dynamic text adventure game.\n\
Based on the player's prompt and the story history, generate the next scene.\n\
Keep the story creative and make every choice meaningful.";

/// Compose the single natural-language instruction for a scene request.
///
/// The prompt has three parts: the fixed preamble, the story history, and
/// the player's latest action.
pub fn scene_prompt(action: &str, history: &str) -> String {
    format!(
        "{STORYTELLER_PREAMBLE}\n\n\
         Story history (what has happened so far):\n{history}\n\n\
         Player's latest action or initial prompt:\n\"{action}\"\n\n\
         Generate the next part of the story."
    )
}

/// Output schema the text model must follow.
///
/// Requires `story`, `imagePrompt`, and `choices` (0-4 strings); an empty
/// `choices` array is the signal that the story has concluded.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "story": {
                "type": "STRING",
                "description": "A paragraph of the story. Make it engaging and descriptive. \
                    If the story is concluding, make this the final paragraph and provide \
                    an empty choices array."
            },
            "imagePrompt": {
                "type": "STRING",
                "description": "A visually rich, detailed prompt for an image generation model. \
                    Describe the scene, characters, and atmosphere. Use styles like \
                    'epic fantasy art', 'cinematic sci-fi concept art', or 'dramatic oil painting'."
            },
            "choices": {
                "type": "ARRAY",
                "description": "Two to four distinct actions the player can take next. \
                    If the story has ended, return an empty array.",
                "items": { "type": "STRING" },
                "maxItems": MAX_CHOICES.to_string()
            }
        },
        "required": ["story", "imagePrompt", "choices"],
        "propertyOrdering": ["story", "imagePrompt", "choices"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_history_and_action() {
        let prompt = scene_prompt("Enter the bar", "\n\n> A detective\n\nRain falls.");
        assert!(prompt.starts_with(STORYTELLER_PREAMBLE));
        assert!(prompt.contains("> A detective\n\nRain falls."));
        assert!(prompt.contains("\"Enter the bar\""));
        let history_at = prompt.find("Story history").unwrap();
        let action_at = prompt.find("\"Enter the bar\"").unwrap();
        assert!(history_at < action_at);
    }

    #[test]
    fn first_turn_has_empty_history() {
        let prompt = scene_prompt("A fantasy quest", "");
        assert!(prompt.contains("so far):\n\n\nPlayer's latest action"));
    }

    #[test]
    fn schema_requires_all_fields() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required, ["story", "imagePrompt", "choices"]);
        assert_eq!(schema["properties"]["choices"]["items"]["type"], "STRING");
        assert_eq!(schema["properties"]["choices"]["maxItems"], "4");
    }
}
