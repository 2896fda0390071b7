//! Protocol errors: a reply arrived but is not a usable agent response.

/// Ways a model reply can fail to become an agent response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AgentProtocolErrorKind {
    /// The service returned no text at all
    #[display("Model returned an empty response")]
    EmptyResponse,
    /// No JSON object or array could be located in the reply
    #[display("No JSON found in model response (length: {})", _0)]
    NoJson(usize),
    /// JSON was located but failed to parse
    #[display("Invalid JSON in model response: {}", _0)]
    InvalidJson(String),
    /// JSON parsed but does not have the agent response shape
    #[display("Model response does not match schema: {}", _0)]
    SchemaMismatch(String),
}

/// Error type for malformed agent replies.
///
/// # Examples
///
/// ```
/// use storyloom_error::{AgentProtocolError, AgentProtocolErrorKind};
///
/// let err = AgentProtocolError::new(AgentProtocolErrorKind::NoJson(42));
/// assert!(format!("{}", err).contains("No JSON"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Agent Protocol Error: {} at line {} in {}", kind, line, file)]
pub struct AgentProtocolError {
    /// The specific error condition
    pub kind: AgentProtocolErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl AgentProtocolError {
    /// Create a new AgentProtocolError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AgentProtocolErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
