//! Trait definitions for the storyloom writing assistant.
//!
//! - [`TextDriver`]: a generative text backend (Gemini, or a test double)
//! - [`CopilotAgent`]: the co-pilot's one-call-per-turn contract
//! - [`NarrativeAnalyzer`]: background script analysis

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{CopilotAgent, NarrativeAnalyzer, TextDriver};
