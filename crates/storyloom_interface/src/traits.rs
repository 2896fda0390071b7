//! Trait definitions at the co-pilot's seams.

use async_trait::async_trait;
use std::sync::Arc;
use storyloom_core::{
    AgentResponse, ConversationMessage, GenerateRequest, GenerateResponse, NarrativeAnalysis,
};
use storyloom_error::StoryloomResult;

/// A generative text backend.
///
/// Implementations perform exactly one network call per `generate` and
/// report every failure as a transport error; interpreting the reply text is
/// left to the caller.
#[async_trait]
pub trait TextDriver: Send + Sync {
    /// Generate a reply for the request.
    async fn generate(&self, req: &GenerateRequest) -> StoryloomResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier used when the request names none.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: TextDriver + ?Sized> TextDriver for Arc<T> {
    async fn generate(&self, req: &GenerateRequest) -> StoryloomResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// The Agent Client contract.
///
/// One call per conversational turn. Implementations never touch the
/// conversation or document; they only return data for the caller to apply.
/// Replies are not deterministic and calls are not idempotent.
#[async_trait]
pub trait CopilotAgent: Send + Sync {
    /// Send one turn.
    ///
    /// `user_text` is non-empty and already trimmed. `history` holds every
    /// prior turn, excluding the new user message.
    ///
    /// # Errors
    ///
    /// Transport errors for connectivity, timeout and service failures;
    /// protocol errors when the reply is not a valid agent response.
    async fn send_turn(
        &self,
        user_text: &str,
        script_snapshot: &str,
        history: &[ConversationMessage],
    ) -> StoryloomResult<AgentResponse>;
}

#[async_trait]
impl<T: CopilotAgent + ?Sized> CopilotAgent for Arc<T> {
    async fn send_turn(
        &self,
        user_text: &str,
        script_snapshot: &str,
        history: &[ConversationMessage],
    ) -> StoryloomResult<AgentResponse> {
        (**self).send_turn(user_text, script_snapshot, history).await
    }
}

/// Produces a pacing / voice / theme report for a script.
#[async_trait]
pub trait NarrativeAnalyzer: Send + Sync {
    /// Analyze the script text.
    async fn analyze(&self, script: &str) -> StoryloomResult<NarrativeAnalysis>;
}

#[async_trait]
impl<T: NarrativeAnalyzer + ?Sized> NarrativeAnalyzer for Arc<T> {
    async fn analyze(&self, script: &str) -> StoryloomResult<NarrativeAnalysis> {
        (**self).analyze(script).await
    }
}
