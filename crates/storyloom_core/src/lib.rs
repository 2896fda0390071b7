//! Core data types for the storyloom writing assistant.
//!
//! This crate holds the co-pilot's data model: the conversation, the action
//! instruction set and its wire validation, the document the actions mutate,
//! and the request/response shapes exchanged with a model backend.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod analysis;
mod document;
mod execution;
mod message;
mod request;
mod response;
mod role;

pub use action::{ActionKind, AgentAction, AssetType};
pub use analysis::{NarrativeAnalysis, ScenePacing, ThemeCoverage, VoiceConsistency};
pub use document::{AssetSuggestion, CursorSelection, DocumentState, UnresolvedAsset};
pub use execution::{ActionWarning, ExecutionResult};
pub use message::{Conversation, ConversationMessage};
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use response::AgentResponse;
pub use role::Role;
