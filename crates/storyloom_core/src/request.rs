//! Request and response types for text generation.

use crate::ConversationMessage;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyloom_error::BuilderError;

/// One call to the generative text service.
///
/// Mirrors the service boundary: a system instruction, the prior turns, and
/// the new message, optionally constrained to JSON matching
/// `response_schema`.
///
/// # Examples
///
/// ```
/// use storyloom_core::{ConversationMessage, GenerateRequest};
///
/// let request = GenerateRequest::builder()
///     .system_instruction("You are a script co-pilot.")
///     .history(vec![ConversationMessage::user("hi"), ConversationMessage::model("hello")])
///     .message("Write a cold open")
///     .temperature(0.7_f32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.history().len(), 2);
/// assert_eq!(request.message(), "Write a cold open");
/// assert!(request.response_schema().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into), build_fn(error = "BuilderError"))]
pub struct GenerateRequest {
    /// Standing instructions for the model
    #[builder(default, setter(strip_option))]
    system_instruction: Option<String>,
    /// Prior turns, oldest first
    #[builder(default)]
    history: Vec<ConversationMessage>,
    /// The new user-side message
    message: String,
    /// JSON schema the reply must satisfy
    #[builder(default, setter(strip_option))]
    response_schema: Option<serde_json::Value>,
    /// Model identifier override
    #[builder(default, setter(strip_option))]
    model: Option<String>,
    /// Sampling temperature
    #[builder(default, setter(strip_option))]
    temperature: Option<f32>,
    /// Output token cap
    #[builder(default, setter(strip_option))]
    max_output_tokens: Option<u32>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// The raw reply text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Text returned by the model
    pub text: String,
}

impl GenerateResponse {
    /// Wrap reply text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
