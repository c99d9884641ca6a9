use serde::{Deserialize, Serialize};

use super::conversation::ContextRecord;

// =============================================================================
// Agent Turn Types
// =============================================================================

/// One customer message handed to the agent loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTurn {
    /// Session the message belongs to.
    pub session_id: String,
    /// Free text typed by the customer (or injected by a quick action).
    pub message: String,
    /// Session metadata appended to the prompt input.
    #[serde(default)]
    pub context: ContextRecord,
}

impl AgentTurn {
    pub fn new(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            message: message.into(),
            context: ContextRecord::new(),
        }
    }

    pub fn with_context(mut self, context: ContextRecord) -> Self {
        self.context = context;
        self
    }
}

/// How a turn reached its final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The model emitted a `Final Answer`.
    Answered,
    /// The model stopped after reasoning without naming a tool.
    ReasoningAsAnswer,
    /// The iteration cap was hit and the last reasoning was used.
    IterationLimit,
    /// Model or internal failure; the reply is an apology.
    Failed,
}

impl TurnOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::ReasoningAsAnswer => "reasoning_as_answer",
            Self::IterationLimit => "iteration_limit",
            Self::Failed => "failed",
        }
    }
}

/// The agent's reply to one turn. Always carries text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReply {
    pub session_id: String,
    pub answer: String,
    pub outcome: TurnOutcome,
    /// Number of tool invocations made while producing the answer.
    pub tool_calls: usize,
}
