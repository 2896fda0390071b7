//! Transport-level failures talking to the generative text service.

/// Conditions under which the agent could not get a reply from the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AgentTransportErrorKind {
    /// API key not found in environment
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Failed to create the backend client
    #[display("Failed to create model client: {}", _0)]
    ClientCreation(String),
    /// Service answered with an HTTP error status
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Request could not be completed (connection reset, DNS, etc.)
    #[display("Model request failed: {}", _0)]
    Request(String),
    /// No reply within the configured timeout
    #[display("Model request timed out after {} seconds", seconds)]
    Timeout {
        /// Configured timeout in seconds, rounded up
        seconds: u64,
    },
}

impl AgentTransportErrorKind {
    /// Timeout kind for `limit`, in whole seconds rounded up so a
    /// sub-second limit never reports zero.
    ///
    /// ```
    /// use std::time::Duration;
    /// use storyloom_error::AgentTransportErrorKind;
    ///
    /// let kind = AgentTransportErrorKind::timeout(Duration::from_millis(250));
    /// assert_eq!(kind, AgentTransportErrorKind::Timeout { seconds: 1 });
    /// ```
    pub fn timeout(limit: std::time::Duration) -> Self {
        let seconds = limit.as_secs() + u64::from(limit.subsec_nanos() > 0);
        AgentTransportErrorKind::Timeout { seconds }
    }

    /// Whether the service reported itself unavailable or overloaded.
    ///
    /// Nothing retries automatically; callers may use this to word the
    /// message shown to the writer.
    pub fn is_service_unavailable(&self) -> bool {
        match self {
            AgentTransportErrorKind::Http { status_code, .. } => {
                matches!(*status_code, 429 | 500 | 502 | 503 | 504)
            }
            AgentTransportErrorKind::Timeout { .. } => true,
            _ => false,
        }
    }
}

/// Transport error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyloom_error::{AgentTransportError, AgentTransportErrorKind};
///
/// let err = AgentTransportError::new(AgentTransportErrorKind::Timeout { seconds: 30 });
/// assert!(format!("{}", err).contains("timed out after 30"));
/// assert!(err.kind.is_service_unavailable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Agent Transport Error: {} at line {} in {}", kind, line, file)]
pub struct AgentTransportError {
    /// The kind of error that occurred
    pub kind: AgentTransportErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AgentTransportError {
    /// Create a new AgentTransportError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AgentTransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
