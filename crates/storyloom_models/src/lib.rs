//! Model backends for storyloom.
//!
//! Each provider sits behind its own feature flag.
//!
//! # Available Providers
//!
//! - **Gemini** (Google) - Enable with `gemini` feature
//!
//! # Example
//!
//! ```toml
//! [dependencies]
//! storyloom_models = { version = "0.1", features = ["gemini"] }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{DEFAULT_MODEL, DEFAULT_TIMEOUT, GeminiClient, GeminiResult};
