//! The Agent Client: one structured model call per conversational turn.

use crate::config::CopilotConfig;
use crate::extraction::parse_reply_json;
use crate::prompts;
use async_trait::async_trait;
use std::time::Duration;
use storyloom_core::{AgentResponse, ConversationMessage, GenerateRequest};
use storyloom_error::{
    AgentTransportError, AgentTransportErrorKind, StoryloomError, StoryloomResult,
};
use storyloom_interface::{CopilotAgent, TextDriver};
use tracing::{debug, instrument, warn};

/// Default upper bound on one turn.
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(60);

/// [`CopilotAgent`] backed by any [`TextDriver`].
///
/// Each turn sends the system instruction, the prior history, and a user
/// message embedding the current script, constrained by the co-pilot
/// response schema. The reply text goes through JSON extraction and
/// per-action validation.
///
/// Failures are classified at this boundary:
/// - anything the driver returns, and the turn timeout, is a transport error
/// - a reply that does not become an [`AgentResponse`] is a protocol error
///
/// # Example
///
/// ```no_run
/// use storyloom_copilot::Copilot;
/// use storyloom_interface::CopilotAgent;
/// use storyloom_models::GeminiClient;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let copilot = Copilot::new(GeminiClient::new()?);
/// let response = copilot.send_turn("Open on a rainy pier", "", &[]).await?;
/// println!("{}", response.display_text);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Copilot<D: TextDriver> {
    driver: D,
    system_instruction: String,
    model: Option<String>,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
    timeout: Duration,
}

impl<D: TextDriver> Copilot<D> {
    /// Agent with the default instruction and timeout.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            system_instruction: prompts::COPILOT_INSTRUCTION.to_string(),
            model: None,
            temperature: None,
            max_output_tokens: None,
            timeout: DEFAULT_TURN_TIMEOUT,
        }
    }

    /// Agent configured from the `[copilot]` table.
    pub fn from_config(driver: D, config: &CopilotConfig) -> Self {
        Self {
            model: config.model().clone(),
            temperature: *config.temperature(),
            max_output_tokens: *config.max_output_tokens(),
            timeout: config.timeout(),
            ..Self::new(driver)
        }
    }

    /// Replace the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Request a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the turn timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Turn timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Assemble the request for one turn.
    pub fn build_request(
        &self,
        user_text: &str,
        script_snapshot: &str,
        history: &[ConversationMessage],
    ) -> StoryloomResult<GenerateRequest> {
        let mut builder = GenerateRequest::builder();
        builder
            .system_instruction(self.system_instruction.clone())
            .history(history.to_vec())
            .message(prompts::turn_message(user_text, script_snapshot))
            .response_schema(prompts::copilot_response_schema());
        if let Some(model) = &self.model {
            builder.model(model.clone());
        }
        if let Some(temperature) = self.temperature {
            builder.temperature(temperature);
        }
        if let Some(max_output_tokens) = self.max_output_tokens {
            builder.max_output_tokens(max_output_tokens);
        }
        Ok(builder.build()?)
    }
}

#[async_trait]
impl<D: TextDriver> CopilotAgent for Copilot<D> {
    #[instrument(
        name = "copilot_send_turn",
        skip_all,
        fields(
            provider = self.driver.provider_name(),
            history_len = history.len(),
            script_len = script_snapshot.len()
        )
    )]
    async fn send_turn(
        &self,
        user_text: &str,
        script_snapshot: &str,
        history: &[ConversationMessage],
    ) -> StoryloomResult<AgentResponse> {
        let request = self.build_request(user_text, script_snapshot, history)?;

        let response = tokio::time::timeout(self.timeout, self.driver.generate(&request))
            .await
            .map_err(|_| {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Co-pilot turn timed out");
                AgentTransportError::new(AgentTransportErrorKind::timeout(self.timeout))
            })?
            .map_err(as_transport)?;

        let value = parse_reply_json(&response.text)?;
        let agent_response = AgentResponse::from_json(&value)?;

        debug!(
            action_count = agent_response.actions.len(),
            display_len = agent_response.display_text.len(),
            "Co-pilot reply parsed"
        );
        Ok(agent_response)
    }
}

/// Drivers report transport errors already; anything else they return still
/// means no usable reply arrived.
fn as_transport(err: StoryloomError) -> StoryloomError {
    if err.is_transport() {
        err
    } else {
        AgentTransportError::new(AgentTransportErrorKind::Request(err.to_string())).into()
    }
}
