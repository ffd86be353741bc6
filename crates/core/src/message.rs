//! Message and conversation turn types.
//!
//! Two shapes live here: [`ConversationTurn`] is what a client sends as chat
//! history, [`Message`] is what goes to the LLM provider. A client can only
//! ever speak as the user or quote the assistant; the system role is reserved
//! for the instruction the orchestrator writes itself.

use serde::{Deserialize, Serialize};

/// The role of a message sent to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (persona, rules, weather context)
    System,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// A single message in the outbound turn sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Who spoke a client-supplied history turn.
///
/// Deserializes from any JSON value: exactly `"assistant"` is the assistant,
/// everything else (including `"system"`, numbers and `null`) is the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawRole", into = "&'static str")]
pub enum TurnRole {
    #[default]
    User,
    Assistant,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRole {
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl From<RawRole> for TurnRole {
    fn from(raw: RawRole) -> Self {
        match raw {
            RawRole::Text(role) if role == "assistant" => TurnRole::Assistant,
            _ => TurnRole::User,
        }
    }
}

impl From<TurnRole> for &'static str {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

impl From<TurnRole> for Role {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        }
    }
}

/// One prior message of a conversation, as held by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(default)]
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&ConversationTurn> for Message {
    fn from(turn: &ConversationTurn) -> Self {
        Message {
            role: turn.role.into(),
            content: turn.content.clone(),
        }
    }
}
