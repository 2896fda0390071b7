//! Error types for the storyloom writing assistant.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` to capture that location
//!
//! The co-pilot distinguishes two agent failure families:
//! [`AgentTransportError`] (the service could not be reached or answered with
//! an error) and [`AgentProtocolError`] (an answer arrived but was not a
//! valid agent response). Both end up as the same apology in the chat.
//!
//! # Examples
//!
//! ```
//! use storyloom_error::{AgentTransportError, AgentTransportErrorKind, StoryloomResult};
//!
//! fn fetch_reply() -> StoryloomResult<String> {
//!     Err(AgentTransportError::new(AgentTransportErrorKind::Request(
//!         "connection refused".to_string(),
//!     )))?
//! }
//!
//! match fetch_reply() {
//!     Ok(reply) => println!("Got: {}", reply),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod protocol;
mod transport;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{StoryloomError, StoryloomErrorKind, StoryloomResult};
pub use protocol::{AgentProtocolError, AgentProtocolErrorKind};
pub use transport::{AgentTransportError, AgentTransportErrorKind};
