//! Controller traits.

use async_trait::async_trait;
use crate::types::{AgentReply, AgentTurn, ConversationTurn};

/// Conversational agent driving one reply per customer message.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Produce a reply. Never fails: failures become an apology text.
    async fn process_message(&self, turn: AgentTurn) -> AgentReply;

    /// Full transcript of a session, oldest first.
    fn conversation_history(&self, session_id: &str) -> Vec<ConversationTurn>;

    /// Forget everything said in a session.
    fn reset_conversation(&self, session_id: &str);
}
