//! The storyloom co-pilot.
//!
//! A conversational agent that edits a script alongside the writer. Each turn
//! sends the writer's request and the current script to a model, receives a
//! chat reply plus an ordered list of [`AgentAction`](storyloom_core::AgentAction)s,
//! and applies those actions to the document with single-level undo.
//!
//! # Layers
//!
//! - [`Copilot`]: the Agent Client, over any [`TextDriver`](storyloom_interface::TextDriver)
//! - [`ActionExecutor`]: interprets actions against a [`DocumentState`](storyloom_core::DocumentState)
//! - [`Session`] / [`SessionHandle`]: the per-editing-session state
//! - [`ConversationController`]: single-flight turns, failure fallback, discard on close
//! - [`AnalysisScheduler`]: debounced pacing / voice / theme analysis
//!
//! # Example
//!
//! ```no_run
//! use storyloom_copilot::{
//!     ActionExecutor, ConversationController, Copilot, Session, SessionHandle, StoryloomConfig,
//! };
//! use storyloom_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoryloomConfig::load()?;
//! let agent = Copilot::from_config(GeminiClient::new()?, config.copilot());
//! let session = SessionHandle::new(Session::new("FADE IN:"));
//! let controller = ConversationController::new(agent, session.clone())
//!     .with_executor(ActionExecutor::with_asset_queue(*config.copilot().asset_queue()));
//!
//! controller.submit("Introduce a detective named Vera").await;
//! println!("{}", session.script_text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analysis;
mod client;
mod config;
mod controller;
mod executor;
mod extraction;
mod prompts;
mod session;

pub use analysis::{AnalysisScheduler, AnalysisStatus, ModelAnalyzer};
pub use client::{Copilot, DEFAULT_TURN_TIMEOUT};
pub use config::{AnalysisConfig, CopilotConfig, StoryloomConfig};
pub use controller::{ConversationController, FALLBACK_MESSAGE, RejectReason, SubmitOutcome};
pub use executor::{ActionExecutor, AssetQueue};
pub use extraction::{extract_json, parse_reply_json};
pub use prompts::{
    ANALYSIS_INSTRUCTION, COPILOT_INSTRUCTION, analysis_schema, copilot_response_schema,
    turn_message,
};
pub use session::{Session, SessionHandle, TurnState};
