use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Conversation & Session Types
// =============================================================================

/// Advisory per-session metadata (`customer_id`, `customer_email`, ...).
///
/// Ordered so that it renders the same way on every turn.
pub type ContextRecord = BTreeMap<String, String>;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in a session's conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Transcript line in the form the prompt expects.
    pub fn transcript_line(&self) -> String {
        match self.role {
            Role::User => format!("Human: {}", self.content),
            Role::Assistant => format!("AI: {}", self.content),
        }
    }
}
