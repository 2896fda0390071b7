//! Conversation messages and the append-only history.

use crate::Role;
use serde::{Deserialize, Serialize};

/// One chat message.
///
/// # Examples
///
/// ```
/// use storyloom_core::{ConversationMessage, Role};
///
/// let message = ConversationMessage::user("Give me a logline");
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.content, "Give me a logline");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// The role of the message sender
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ConversationMessage {
    /// Create a message with the given role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a message authored by the writer.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a message authored by the model.
    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content)
    }
}

/// Ordered, append-only chat history.
///
/// An optional welcome message may be placed at the head when the
/// conversation is created. It is part of what the writer sees
/// ([`messages`](Self::messages)) but never part of what the model receives
/// ([`history`](Self::history)).
///
/// # Examples
///
/// ```
/// use storyloom_core::{Conversation, ConversationMessage};
///
/// let mut conversation = Conversation::with_welcome("Hi! What are we writing today?");
/// conversation.push(ConversationMessage::user("A heist comedy"));
///
/// assert_eq!(conversation.messages().len(), 2);
/// assert_eq!(conversation.history().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
    has_welcome: bool,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a conversation headed by a model-authored welcome message.
    pub fn with_welcome(welcome: impl Into<String>) -> Self {
        Self {
            messages: vec![ConversationMessage::model(welcome)],
            has_welcome: true,
        }
    }

    /// Appends a message. Messages are never reordered or removed.
    pub fn push(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    /// Everything shown to the writer, welcome included.
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Turn history sent to the model: every message after the welcome.
    pub fn history(&self) -> &[ConversationMessage] {
        if self.has_welcome {
            self.messages.get(1..).unwrap_or_default()
        } else {
            &self.messages
        }
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    /// Number of messages including the welcome.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when no message (not even a welcome) exists.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
