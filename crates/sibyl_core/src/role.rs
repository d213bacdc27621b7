//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Roles for prompt messages.
///
/// # Examples
///
/// ```
/// use sibyl_core::Role;
///
/// assert_eq!(format!("{}", Role::System), "System");
/// assert_eq!(Role::Assistant.as_wire_str(), "assistant");
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
pub enum Role {
    /// System messages provide context and instructions
    System,
    /// User messages are from the human
    User,
    /// Assistant messages are from the model
    Assistant,
}

impl Role {
    /// The lowercase role string used by chat-completions wire formats.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}
