//! The co-pilot's action instruction set and its wire validation.
//!
//! The model replies with a list of `{ "type": TAG, "payload": {...} }`
//! entries. Each entry is validated on its own: anything with an unknown tag
//! or a payload of the wrong shape becomes [`AgentAction::Unknown`] so that
//! one bad entry never costs the rest of the batch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Wire tags for the recognized action types.
///
/// # Examples
///
/// ```
/// use storyloom_core::ActionKind;
/// use std::str::FromStr;
///
/// assert_eq!(ActionKind::from_str("SCRIPT_INSERT_AT_CURSOR").unwrap(), ActionKind::ScriptInsertAtCursor);
/// assert_eq!(ActionKind::UiHighlight.to_string(), "UI_HIGHLIGHT");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Append text to the end of the script
    ScriptAppend,
    /// Replace the whole script
    ScriptReplace,
    /// Insert text at the writer's cursor
    ScriptInsertAtCursor,
    /// Suggest a new character, object or scene asset
    AssetCreateSuggestion,
    /// Ask the editor to highlight a passage
    UiHighlight,
}

/// Category of a suggested story asset.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum AssetType {
    /// A person or creature in the story
    Character,
    /// A prop or item
    Object,
    /// A location or setting
    Scene,
}

/// One instruction from the co-pilot.
///
/// # Examples
///
/// ```
/// use storyloom_core::AgentAction;
/// use serde_json::json;
///
/// let action = AgentAction::from_wire(&json!({
///     "type": "SCRIPT_APPEND",
///     "payload": { "content": "FADE OUT." }
/// }));
/// assert_eq!(action, AgentAction::ScriptAppend { content: "FADE OUT.".to_string() });
///
/// let unknown = AgentAction::from_wire(&json!({ "type": "PLAY_MUSIC", "payload": {} }));
/// assert!(unknown.is_unknown());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgentAction {
    /// Append `content` to the script
    ScriptAppend {
        /// Text to append
        content: String,
    },
    /// Replace the script with `content`
    ScriptReplace {
        /// New script text
        content: String,
    },
    /// Insert `content` at the cursor selection
    ScriptInsertAtCursor {
        /// Text to insert
        content: String,
    },
    /// Suggest a new asset
    AssetCreateSuggestion {
        /// Asset display name
        asset_name: String,
        /// Asset category
        asset_type: AssetType,
        /// Short description
        description: String,
    },
    /// Highlight a passage in the editor
    UiHighlight {
        /// Passage to highlight
        text_to_highlight: String,
    },
    /// An entry that could not be interpreted
    Unknown {
        /// The raw `type` tag, or `"<missing>"`
        action_type: String,
        /// Why the entry was rejected
        reason: String,
    },
}

#[derive(Deserialize)]
struct ContentPayload {
    content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetPayload {
    asset_name: String,
    asset_type: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HighlightPayload {
    text_to_highlight: String,
}

const MISSING_TYPE: &str = "<missing>";

impl AgentAction {
    /// Validate one wire entry.
    ///
    /// The payload is read from the `payload` key. When that key is absent
    /// the entry object itself is treated as the payload.
    pub fn from_wire(entry: &Value) -> Self {
        let Some(object) = entry.as_object() else {
            return Self::unknown(MISSING_TYPE, "action entry is not an object");
        };

        let Some(tag) = object.get("type").and_then(Value::as_str) else {
            return Self::unknown(MISSING_TYPE, "action entry has no string 'type'");
        };

        let Ok(kind) = ActionKind::from_str(tag) else {
            return Self::unknown(tag, "unrecognized action type");
        };

        let payload = object.get("payload").unwrap_or(entry);

        match Self::from_payload(kind, payload) {
            Ok(action) => action,
            Err(reason) => Self::unknown(tag, reason),
        }
    }

    fn from_payload(kind: ActionKind, payload: &Value) -> Result<Self, String> {
        match kind {
            ActionKind::ScriptAppend => {
                let p: ContentPayload = parse_payload(payload)?;
                Ok(Self::ScriptAppend { content: p.content })
            }
            ActionKind::ScriptReplace => {
                let p: ContentPayload = parse_payload(payload)?;
                Ok(Self::ScriptReplace { content: p.content })
            }
            ActionKind::ScriptInsertAtCursor => {
                let p: ContentPayload = parse_payload(payload)?;
                Ok(Self::ScriptInsertAtCursor { content: p.content })
            }
            ActionKind::AssetCreateSuggestion => {
                let p: AssetPayload = parse_payload(payload)?;
                let asset_name = p.asset_name.trim().to_string();
                if asset_name.is_empty() {
                    return Err("assetName is empty".to_string());
                }
                let asset_type = AssetType::from_str(p.asset_type.trim())
                    .map_err(|_| format!("unsupported assetType '{}'", p.asset_type))?;
                Ok(Self::AssetCreateSuggestion {
                    asset_name,
                    asset_type,
                    description: p.description,
                })
            }
            ActionKind::UiHighlight => {
                let p: HighlightPayload = parse_payload(payload)?;
                Ok(Self::UiHighlight {
                    text_to_highlight: p.text_to_highlight,
                })
            }
        }
    }

    fn unknown(action_type: &str, reason: impl Into<String>) -> Self {
        Self::Unknown {
            action_type: action_type.to_string(),
            reason: reason.into(),
        }
    }

    /// The recognized kind, or `None` for [`AgentAction::Unknown`].
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Self::ScriptAppend { .. } => Some(ActionKind::ScriptAppend),
            Self::ScriptReplace { .. } => Some(ActionKind::ScriptReplace),
            Self::ScriptInsertAtCursor { .. } => Some(ActionKind::ScriptInsertAtCursor),
            Self::AssetCreateSuggestion { .. } => Some(ActionKind::AssetCreateSuggestion),
            Self::UiHighlight { .. } => Some(ActionKind::UiHighlight),
            Self::Unknown { .. } => None,
        }
    }

    /// Whether applying this action changes the script text.
    pub fn mutates_script(&self) -> bool {
        matches!(
            self,
            Self::ScriptAppend { .. } | Self::ScriptReplace { .. } | Self::ScriptInsertAtCursor { .. }
        )
    }

    /// True for the catch-all variant.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }

    /// Render the action in its wire form.
    ///
    /// Returns `None` for [`AgentAction::Unknown`], which has no wire form.
    pub fn to_wire(&self) -> Option<Value> {
        let kind = self.kind()?;
        let payload = match self {
            Self::ScriptAppend { content }
            | Self::ScriptReplace { content }
            | Self::ScriptInsertAtCursor { content } => serde_json::json!({ "content": content }),
            Self::AssetCreateSuggestion {
                asset_name,
                asset_type,
                description,
            } => serde_json::json!({
                "assetName": asset_name,
                "assetType": asset_type.to_string(),
                "description": description,
            }),
            Self::UiHighlight { text_to_highlight } => {
                serde_json::json!({ "textToHighlight": text_to_highlight })
            }
            Self::Unknown { .. } => return None,
        };
        Some(serde_json::json!({ "type": kind.to_string(), "payload": payload }))
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(payload: &Value) -> Result<T, String> {
    T::deserialize(payload).map_err(|e| format!("malformed payload: {}", e))
}
