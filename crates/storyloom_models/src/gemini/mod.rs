//! Google Gemini API backend.

mod client;

pub use client::{DEFAULT_MODEL, DEFAULT_TIMEOUT, GeminiClient};

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, storyloom_error::AgentTransportError>;
