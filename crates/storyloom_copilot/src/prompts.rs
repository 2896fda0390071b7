//! Prompt text and response schemas sent to the model.

use serde_json::{Value, json};
use storyloom_core::{ActionKind, AssetType};
use strum::IntoEnumIterator;

/// System instruction for co-pilot turns.
pub const COPILOT_INSTRUCTION: &str = "\
You are a creative writing co-pilot working inside a script editor. \
The writer talks to you in a chat pane next to their script. \
Every reply is a JSON object with two fields: \"displayText\", the message shown \
to the writer, and \"actions\", an ordered list of edits for the editor to apply.

Available actions:
- SCRIPT_APPEND {content}: add text to the end of the script.
- SCRIPT_REPLACE {content}: replace the whole script.
- SCRIPT_INSERT_AT_CURSOR {content}: insert text at the writer's cursor, replacing any selection.
- ASSET_CREATE_SUGGESTION {assetName, assetType, description}: propose a character, object or scene the writer may want to track. assetType is CHARACTER, OBJECT or SCENE.
- UI_HIGHLIGHT {textToHighlight}: point the writer at a passage without changing it.

Only emit script actions when the writer asks for changes to the script. \
Use an empty actions list for pure conversation. \
Never repeat the script in displayText; put script text in actions.";

/// System instruction for narrative analysis.
pub const ANALYSIS_INSTRUCTION: &str = "\
You are a script editor reviewing a draft. Report on pacing scene by scene, \
the consistency of each character's voice, and how strongly each theme is \
carried. Scores are integers from 1 to 10. Answer with JSON only.";

/// User message for one co-pilot turn: the script as it is now, then the
/// writer's request.
pub fn turn_message(user_text: &str, script_snapshot: &str) -> String {
    if script_snapshot.trim().is_empty() {
        format!("The script is currently empty.\n\nWriter's request:\n{user_text}")
    } else {
        format!(
            "Current script:\n<script>\n{script_snapshot}\n</script>\n\nWriter's request:\n{user_text}"
        )
    }
}

/// User message for an analysis run.
pub fn analysis_message(script: &str) -> String {
    format!("Analyze this script:\n<script>\n{script}\n</script>")
}

/// Response schema constraining co-pilot replies.
///
/// The action type enum is generated from [`ActionKind`], so the schema and
/// the executor cannot drift apart.
pub fn copilot_response_schema() -> Value {
    let action_types: Vec<String> = ActionKind::iter().map(|kind| kind.to_string()).collect();
    let asset_types: Vec<String> = AssetType::iter()
        .map(|kind| kind.to_string().to_uppercase())
        .collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "displayText": { "type": "STRING" },
            "actions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": { "type": "STRING", "enum": action_types },
                        "payload": {
                            "type": "OBJECT",
                            "properties": {
                                "content": { "type": "STRING" },
                                "assetName": { "type": "STRING" },
                                "assetType": { "type": "STRING", "enum": asset_types },
                                "description": { "type": "STRING" },
                                "textToHighlight": { "type": "STRING" }
                            }
                        }
                    },
                    "required": ["type", "payload"]
                }
            }
        },
        "required": ["displayText", "actions"]
    })
}

/// Response schema for [`NarrativeAnalysis`](storyloom_core::NarrativeAnalysis).
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "pacing": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "scene": { "type": "STRING" },
                        "tension": { "type": "INTEGER" },
                        "note": { "type": "STRING" }
                    },
                    "required": ["scene", "tension"]
                }
            },
            "characterVoice": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "character": { "type": "STRING" },
                        "consistency": { "type": "INTEGER" },
                        "note": { "type": "STRING" }
                    },
                    "required": ["character", "consistency"]
                }
            },
            "themes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "theme": { "type": "STRING" },
                        "coverage": { "type": "INTEGER" }
                    },
                    "required": ["theme", "coverage"]
                }
            }
        },
        "required": ["summary"]
    })
}
