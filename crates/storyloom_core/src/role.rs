//! Conversation participant roles.

use serde::{Deserialize, Serialize};

/// Who authored a conversation message.
///
/// Serialized in lowercase (`"user"`, `"model"`), matching the role names the
/// generative text service expects in its history entries.
///
/// # Examples
///
/// ```
/// use storyloom_core::Role;
///
/// assert_ne!(Role::User, Role::Model);
/// assert_eq!(format!("{}", Role::Model), "model");
/// assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The writer using the editor
    #[display("user")]
    User,
    /// The co-pilot model
    #[display("model")]
    Model,
}
