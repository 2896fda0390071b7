//! A single agent turn's structured reply.

use crate::AgentAction;
use serde_json::Value;
use storyloom_error::{AgentProtocolError, AgentProtocolErrorKind};

/// What the co-pilot said and what it wants done.
///
/// Only `display_text` outlives the turn; it becomes a model message in the
/// conversation. The actions are handed to the executor and dropped.
///
/// # Examples
///
/// ```
/// use storyloom_core::{AgentAction, AgentResponse};
/// use serde_json::json;
///
/// let response = AgentResponse::from_json(&json!({
///     "displayText": "Here's an outline",
///     "actions": [{ "type": "SCRIPT_REPLACE", "payload": { "content": "ACT I" } }]
/// }))
/// .unwrap();
///
/// assert_eq!(response.display_text, "Here's an outline");
/// assert_eq!(response.actions, vec![AgentAction::ScriptReplace { content: "ACT I".to_string() }]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentResponse {
    /// Chat text shown to the writer
    pub display_text: String,
    /// Ordered actions to apply
    pub actions: Vec<AgentAction>,
}

impl AgentResponse {
    /// Create a response.
    pub fn new(display_text: impl Into<String>, actions: Vec<AgentAction>) -> Self {
        Self {
            display_text: display_text.into(),
            actions,
        }
    }

    /// Validate a parsed JSON reply against the agent response shape.
    ///
    /// The top level must be an object with a string `displayText`. A missing
    /// or `null` `actions` key means no actions; anything else that is not an
    /// array is a schema mismatch. Individual entries are validated by
    /// [`AgentAction::from_wire`] and never fail the response.
    ///
    /// # Errors
    ///
    /// Returns [`AgentProtocolErrorKind::SchemaMismatch`] when the top-level
    /// shape is wrong.
    pub fn from_json(value: &Value) -> Result<Self, AgentProtocolError> {
        let object = value.as_object().ok_or_else(|| {
            AgentProtocolError::new(AgentProtocolErrorKind::SchemaMismatch(format!(
                "expected an object, found {}",
                json_type_name(value)
            )))
        })?;

        let display_text = match object.get("displayText") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => {
                return Err(AgentProtocolError::new(
                    AgentProtocolErrorKind::SchemaMismatch(format!(
                        "displayText must be a string, found {}",
                        json_type_name(other)
                    )),
                ));
            }
            None => {
                return Err(AgentProtocolError::new(
                    AgentProtocolErrorKind::SchemaMismatch("missing displayText".to_string()),
                ));
            }
        };

        let actions = match object.get("actions") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries.iter().map(AgentAction::from_wire).collect(),
            Some(other) => {
                return Err(AgentProtocolError::new(
                    AgentProtocolErrorKind::SchemaMismatch(format!(
                        "actions must be an array, found {}",
                        json_type_name(other)
                    )),
                ));
            }
        };

        Ok(Self {
            display_text,
            actions,
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
