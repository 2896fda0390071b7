//! Google Gemini REST client.
//!
//! [`GeminiClient`] keeps one `gemini_rust::Gemini` per model, created lazily
//! on first use, so a session can point the co-pilot and the analyzer at
//! different models through one client.
//!
//! Every failure, including a timeout, comes back as an
//! [`AgentTransportError`]. The client does not retry.
//!
//! # Example
//!
//! ```no_run
//! use storyloom_core::GenerateRequest;
//! use storyloom_interface::TextDriver;
//! use storyloom_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new()?;
//! let request = GenerateRequest::builder()
//!     .message("Suggest a title for a heist comedy")
//!     .build()?;
//! let response = client.generate(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use gemini_rust::{Gemini, client::Model};

use storyloom_core::{GenerateRequest, GenerateResponse, Role};
use storyloom_error::{AgentTransportError, AgentTransportErrorKind, StoryloomResult};
use storyloom_interface::TextDriver;

use super::GeminiResult;

/// Model used when neither the client nor the request names one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Gemini API with per-model client pooling.
pub struct GeminiClient {
    /// Cache of model-specific clients
    clients: Arc<Mutex<HashMap<String, Gemini>>>,
    /// API key for creating new clients
    api_key: String,
    /// Default model name when the request names none
    model_name: String,
    /// Upper bound on one request
    timeout: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let client_count = self
            .clients
            .lock()
            .map(|clients| clients.len())
            .unwrap_or_default();
        f.debug_struct("GeminiClient")
            .field("model_name", &self.model_name)
            .field("timeout", &self.timeout)
            .field("cached_clients", &client_count)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client using `GEMINI_API_KEY` and the default model.
    ///
    /// # Errors
    ///
    /// Returns [`AgentTransportErrorKind::MissingApiKey`] if the variable is
    /// unset.
    #[instrument(name = "gemini_client_new")]
    pub fn new() -> StoryloomResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| AgentTransportError::new(AgentTransportErrorKind::MissingApiKey))?;
        Ok(Self::with_api_key(api_key))
    }

    /// Create a client with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            api_key: api_key.into(),
            model_name: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the default model.
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configured per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// Unrecognized names become `Model::Custom` with the `models/` prefix
    /// the API requires.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other if other.starts_with("models/") => Model::Custom(other.to_string()),
            other => Model::Custom(format!("models/{}", other)),
        }
    }

    /// Get or create the client for `model_name`.
    fn client_for(&self, model_name: &str) -> GeminiResult<Gemini> {
        let mut clients = self
            .clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(client) = clients.get(model_name) {
            return Ok(client.clone());
        }

        debug!(model = model_name, "Creating Gemini client for model");
        let client = Gemini::with_model(&self.api_key, Self::model_name_to_enum(model_name))
            .map_err(|e| {
                AgentTransportError::new(AgentTransportErrorKind::ClientCreation(e.to_string()))
            })?;
        clients.insert(model_name.to_string(), client.clone());
        Ok(client)
    }

    /// Internal generate method that returns transport errors.
    async fn generate_internal(&self, req: &GenerateRequest) -> GeminiResult<GenerateResponse> {
        let model_name = req.model().as_deref().unwrap_or(&self.model_name);
        let client = self.client_for(model_name)?;

        let mut builder = client.generate_content();

        if let Some(system) = req.system_instruction() {
            builder = builder.with_system_prompt(system);
        }

        for message in req.history() {
            builder = match message.role {
                Role::User => builder.with_user_message(&message.content),
                Role::Model => builder.with_model_message(&message.content),
            };
        }

        builder = builder.with_user_message(req.message());

        if let Some(schema) = req.response_schema() {
            builder = builder
                .with_response_mime_type("application/json")
                .with_response_schema(schema.clone());
        }

        if let Some(temperature) = req.temperature() {
            builder = builder.with_temperature(*temperature);
        }

        if let Some(max_tokens) = req.max_output_tokens() {
            builder = builder.with_max_output_tokens(*max_tokens as i32);
        }

        let response = tokio::time::timeout(self.timeout, builder.execute())
            .await
            .map_err(|_| {
                warn!(
                    model = model_name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Gemini request timed out"
                );
                AgentTransportError::new(AgentTransportErrorKind::timeout(self.timeout))
            })?
            .map_err(Self::parse_gemini_error)?;

        Ok(GenerateResponse::new(response.text()))
    }

    /// Parse gemini-rust errors to extract HTTP status codes.
    ///
    /// Example input: "bad response from server; code 503; description: ..."
    fn parse_gemini_error(err: impl std::fmt::Display) -> AgentTransportError {
        let err_msg = err.to_string();

        if let Some(status_code) = Self::extract_status_code(&err_msg) {
            AgentTransportError::new(AgentTransportErrorKind::Http {
                status_code,
                message: err_msg,
            })
        } else {
            AgentTransportError::new(AgentTransportErrorKind::Request(err_msg))
        }
    }

    /// Extract the numeric status code following "code " in an error message.
    fn extract_status_code(error_msg: &str) -> Option<u16> {
        let code_start = error_msg.find("code ")?;
        let code_str = &error_msg[code_start + 5..];
        let end = code_str
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(code_str.len());
        code_str[..end].parse().ok()
    }
}

#[async_trait]
impl TextDriver for GeminiClient {
    #[instrument(
        name = "gemini_generate",
        skip(self, req),
        fields(
            model = req.model().as_deref().unwrap_or(&self.model_name),
            history_len = req.history().len(),
            structured = req.response_schema().is_some()
        )
    )]
    async fn generate(&self, req: &GenerateRequest) -> StoryloomResult<GenerateResponse> {
        self.generate_internal(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_status_code() {
        assert_eq!(
            GeminiClient::extract_status_code("bad response from server; code 503; description: x"),
            Some(503)
        );
        assert_eq!(GeminiClient::extract_status_code("code 429"), Some(429));
        assert_eq!(GeminiClient::extract_status_code("connection reset"), None);
    }

    #[test]
    fn test_parse_gemini_error_classifies() {
        let err = GeminiClient::parse_gemini_error("bad response; code 401; unauthorized");
        assert!(matches!(
            err.kind,
            AgentTransportErrorKind::Http {
                status_code: 401,
                ..
            }
        ));

        let err = GeminiClient::parse_gemini_error("dns failure");
        assert!(matches!(err.kind, AgentTransportErrorKind::Request(_)));
    }

    #[test]
    fn test_model_name_to_enum_prefixes_custom() {
        match GeminiClient::model_name_to_enum("gemini-2.0-flash") {
            Model::Custom(name) => assert_eq!(name, "models/gemini-2.0-flash"),
            other => panic!("unexpected model {:?}", other),
        }
    }
}
