//! Top-level error wrapper types.

use crate::{AgentProtocolError, AgentTransportError, BuilderError, ConfigError};

/// Every failure a storyloom crate can surface.
///
/// # Examples
///
/// ```
/// use storyloom_error::{AgentProtocolError, AgentProtocolErrorKind, StoryloomError};
///
/// let err: StoryloomError = AgentProtocolError::new(AgentProtocolErrorKind::EmptyResponse).into();
/// assert!(err.is_protocol());
/// assert!(!err.is_transport());
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryloomErrorKind {
    /// Could not reach the model service
    #[from(AgentTransportError)]
    Transport(AgentTransportError),
    /// Model reply could not be understood
    #[from(AgentProtocolError)]
    Protocol(AgentProtocolError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Storyloom error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyloom_error::{AgentTransportError, AgentTransportErrorKind, StoryloomResult};
///
/// fn call_model() -> StoryloomResult<String> {
///     Err(AgentTransportError::new(AgentTransportErrorKind::MissingApiKey))?
/// }
///
/// let err = call_model().unwrap_err();
/// assert!(err.is_transport());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyloom Error: {}", _0)]
pub struct StoryloomError(Box<StoryloomErrorKind>);

impl StoryloomError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryloomErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryloomErrorKind {
        &self.0
    }

    /// Consume the wrapper and return the kind.
    pub fn into_kind(self) -> StoryloomErrorKind {
        *self.0
    }

    /// True for connectivity, timeout and service failures.
    pub fn is_transport(&self) -> bool {
        matches!(*self.0, StoryloomErrorKind::Transport(_))
    }

    /// True when a reply arrived but did not parse into an agent response.
    pub fn is_protocol(&self) -> bool {
        matches!(*self.0, StoryloomErrorKind::Protocol(_))
    }
}

impl<T> From<T> for StoryloomError
where
    T: Into<StoryloomErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for storyloom operations.
pub type StoryloomResult<T> = std::result::Result<T, StoryloomError>;
