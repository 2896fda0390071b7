//! Storyloom: a conversational co-pilot that edits a script alongside the
//! writer.
//!
//! The writer chats with the co-pilot; each reply may carry an ordered list
//! of actions (append, replace, insert at cursor, suggest an asset,
//! highlight a passage) that are applied to the script with single-level
//! undo.
//!
//! # Quick Start
//!
//! ```no_run
//! use storyloom::{ConversationController, Copilot, GeminiClient, Session, SessionHandle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionHandle::new(Session::new(""));
//!     let controller =
//!         ConversationController::new(Copilot::new(GeminiClient::new()?), session.clone());
//!
//!     controller.submit("Outline a 3-act story about a fox").await;
//!     println!("{}", session.script_text());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `gemini` (default) - Google Gemini backend and the `storyloom` binary
//! - `observability` - OpenTelemetry span export
//!
//! # Architecture
//!
//! - `storyloom_error` - Error types
//! - `storyloom_core` - Data model: messages, actions, document state
//! - `storyloom_interface` - `TextDriver`, `CopilotAgent`, `NarrativeAnalyzer`
//! - `storyloom_models` - Model backends
//! - `storyloom_copilot` - Agent client, executor, controller, analysis
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod observability;

pub use observability::{
    ObservabilityConfig, ObservabilityError, ObservabilityGuard, init_observability,
};

pub use storyloom_error::{
    AgentProtocolError, AgentProtocolErrorKind, AgentTransportError, AgentTransportErrorKind,
    BuilderError, BuilderErrorKind, ConfigError, ConfigErrorKind, StoryloomError,
    StoryloomErrorKind, StoryloomResult,
};

pub use storyloom_core::{
    ActionKind, ActionWarning, AgentAction, AgentResponse, AssetSuggestion, AssetType,
    Conversation, ConversationMessage, CursorSelection, DocumentState, ExecutionResult,
    GenerateRequest, GenerateRequestBuilder, GenerateResponse, NarrativeAnalysis, Role,
    ScenePacing, ThemeCoverage, UnresolvedAsset, VoiceConsistency,
};

pub use storyloom_interface::{CopilotAgent, NarrativeAnalyzer, TextDriver};

pub use storyloom_copilot::{
    ActionExecutor, AnalysisConfig, AnalysisScheduler, AnalysisStatus, AssetQueue,
    ConversationController, Copilot, CopilotConfig, FALLBACK_MESSAGE, ModelAnalyzer,
    RejectReason, Session, SessionHandle, StoryloomConfig, SubmitOutcome, TurnState,
};

#[cfg(feature = "gemini")]
pub use storyloom_models::{GeminiClient, GeminiResult};
