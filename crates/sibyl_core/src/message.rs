//! Message types for prompt construction.

use crate::Role;
use serde::{Deserialize, Serialize};

/// A text message in a prompt exchange.
///
/// # Examples
///
/// ```
/// use sibyl_core::{Message, Role};
///
/// let message = Message::user("list all users");
///
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.content, "list all users");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The text content of the message
    pub content: String,
}

impl Message {
    /// Creates a message with the given role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
