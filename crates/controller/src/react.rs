//! ReAct loop implementation.
//!
//! ReAct (Reason + Act) is the core control loop for the agent:
//! 1. Render the prompt with history, input and the scratch-pad
//! 2. Ask the model for the next step
//! 3. Execute the requested tool and append the observation
//! 4. Repeat until the model answers or the iteration cap is hit
//!
//! Every turn ends with a reply. Model failures become an apology and the
//! detail goes to the log.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

use shopdesk_core::{
    config::AgentConfig,
    template::PromptTemplate,
    traits::{Controller, LlmClient, LlmResponse},
    types::{AgentReply, AgentTurn, ConversationTurn, ToolDefinition, TurnOutcome},
    Error, Result,
};
use shopdesk_governance::{track_llm_latency, track_tokens, track_turn};

use crate::executor::ToolExecutor;
use crate::memory::SessionMemories;
use crate::parser::{ActionParser, ParsedStep, ToolInvocation};
use crate::prompt::PromptVars;

/// Reply sent when the model or the loop fails.
pub const APOLOGY: &str = "I apologize, but I encountered an error while processing your request. Please try again in a moment.";

/// Reply used when the iteration cap is hit before any reasoning was produced.
const NO_ANSWER: &str = "I'm sorry, I wasn't able to work that out. Could you rephrase your request or add a few more details?";

/// Observation fed back when a completion contained nothing usable.
const INVALID_FORMAT: &str = "Invalid format. Reply with an Action and Action Input, or with a Final Answer.";

/// ReAct controller configuration.
#[derive(Debug, Clone)]
pub struct ReActConfig {
    /// Maximum model calls per turn before an answer is forced.
    pub max_iterations: usize,
    /// Number of most recent turns replayed into the prompt.
    pub memory_window: usize,
    /// Turns retained per session.
    pub memory_capacity: usize,
    /// Timeout for one model call.
    pub llm_timeout: Duration,
}

impl Default for ReActConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            memory_window: 10,
            memory_capacity: 200,
            llm_timeout: Duration::from_secs(60),
        }
    }
}

impl From<&AgentConfig> for ReActConfig {
    fn from(config: &AgentConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            memory_window: config.memory_window,
            memory_capacity: config.memory_capacity,
            llm_timeout: Duration::from_secs(config.llm_timeout_secs),
        }
    }
}

/// Where the loop is within one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentState {
    /// Waiting for the model's next step.
    Thinking,
    /// A tool call to execute. `log` is replayed before its observation.
    Acting {
        invocation: ToolInvocation,
        log: String,
    },
    /// Done.
    Answering {
        answer: String,
        outcome: TurnOutcome,
    },
}

/// Mutable state of one `process_message` call.
struct AgentRun {
    vars: PromptVars,
    iterations: usize,
    last_thought: String,
    tool_calls: usize,
}

impl AgentRun {
    fn note_thought(&mut self, thought: &str) {
        if !thought.trim().is_empty() {
            self.last_thought = thought.trim().to_string();
        }
    }

    fn record_observation(&mut self, log: &str, observation: &str) {
        let pad = &mut self.vars.agent_scratchpad;
        pad.push_str(log);
        pad.push_str("\nObservation: ");
        pad.push_str(observation);
        pad.push_str("\nThought: ");
    }

    fn forced_answer(&self) -> String {
        if self.last_thought.is_empty() {
            NO_ANSWER.to_string()
        } else {
            self.last_thought.clone()
        }
    }
}

/// ReAct controller answering customer messages.
pub struct ReActController {
    /// Configuration.
    pub(crate) config: ReActConfig,
    /// LLM client for reasoning.
    pub(crate) llm: Arc<dyn LlmClient>,
    /// Tool access and observation formatting.
    pub(crate) executor: ToolExecutor,
    /// Tool definitions rendered into the prompt.
    pub(crate) tools: Vec<ToolDefinition>,
    pub(crate) prompt: PromptTemplate,
    pub(crate) parser: ActionParser,
    /// Per-session conversation logs.
    pub(crate) memories: SessionMemories,
}

impl ReActController {
    /// Create a new builder for ReActController.
    pub fn builder() -> crate::builder::ReActBuilder {
        crate::builder::ReActBuilder::new()
    }

    pub fn config(&self) -> &ReActConfig {
        &self.config
    }

    /// Tool definitions the agent can use.
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    fn start_run(&self, turn: &AgentTurn) -> AgentRun {
        let mut input = turn.message.clone();
        if !turn.context.is_empty() {
            let context = serde_json::to_string(&turn.context).unwrap_or_default();
            input.push_str("\nCustomer Context: ");
            input.push_str(&context);
        }

        let chat_history = self
            .memories
            .render_window(&turn.session_id, self.config.memory_window);

        AgentRun {
            vars: PromptVars::new(&self.tools, chat_history, input),
            iterations: 0,
            last_thought: String::new(),
            tool_calls: 0,
        }
    }

    async fn run_loop(&self, session_id: &str, run: &mut AgentRun) -> Result<(String, TurnOutcome)> {
        let mut state = AgentState::Thinking;
        loop {
            state = match state {
                AgentState::Thinking => self.think(session_id, run).await?,
                AgentState::Acting { invocation, log } => {
                    let observation = self.executor.execute(&invocation).await;
                    run.tool_calls += 1;
                    run.record_observation(&log, &observation);
                    AgentState::Thinking
                }
                AgentState::Answering { answer, outcome } => return Ok((answer, outcome)),
            };
        }
    }

    /// One model call and the state it leads to.
    async fn think(&self, session_id: &str, run: &mut AgentRun) -> Result<AgentState> {
        if run.iterations >= self.config.max_iterations {
            tracing::warn!(
                session_id = %session_id,
                max_iterations = self.config.max_iterations,
                "Iteration limit reached, forcing an answer"
            );
            return Ok(AgentState::Answering {
                answer: run.forced_answer(),
                outcome: TurnOutcome::IterationLimit,
            });
        }
        run.iterations += 1;

        tracing::info!(
            session_id = %session_id,
            iteration = run.iterations,
            tool_calls = run.tool_calls,
            "Executing ReAct iteration"
        );

        let prompt = self.prompt.render(&run.vars)?;
        let response = self.call_llm(&prompt).await?;

        let state = match self.parser.parse(&response.content) {
            ParsedStep::Act {
                thought,
                log,
                invocation,
            } => {
                run.note_thought(&thought);
                tracing::debug!(session_id = %session_id, tool = %invocation.tool, "Model chose a tool");
                AgentState::Acting { invocation, log }
            }
            ParsedStep::Answer { answer, .. } => AgentState::Answering {
                answer,
                outcome: TurnOutcome::Answered,
            },
            ParsedStep::Reasoning { thought } => AgentState::Answering {
                answer: thought,
                outcome: TurnOutcome::ReasoningAsAnswer,
            },
            ParsedStep::Empty => {
                tracing::warn!(session_id = %session_id, "Model returned no usable step");
                run.record_observation("", INVALID_FORMAT);
                AgentState::Thinking
            }
        };
        Ok(state)
    }

    async fn call_llm(&self, prompt: &str) -> Result<LlmResponse> {
        let started = Instant::now();
        let response = tokio::time::timeout(self.config.llm_timeout, self.llm.complete(prompt))
            .await
            .map_err(|_| {
                Error::Timeout(format!(
                    "model call exceeded {:.1}s",
                    self.config.llm_timeout.as_secs_f64()
                ))
            })??;

        let model = self.llm.model();
        track_llm_latency(model, started.elapsed().as_secs_f64());
        track_tokens(
            model,
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
        );
        tracing::debug!(
            model = %model,
            response_len = response.content.len(),
            finish_reason = %response.finish_reason,
            "LLM response received"
        );
        Ok(response)
    }
}

#[async_trait]
impl Controller for ReActController {
    async fn process_message(&self, turn: AgentTurn) -> AgentReply {
        tracing::info!(session_id = %turn.session_id, "Processing customer message");

        let mut run = self.start_run(&turn);
        let (answer, outcome) = match self.run_loop(&turn.session_id, &mut run).await {
            Ok(done) => done,
            Err(e) => {
                tracing::error!(
                    session_id = %turn.session_id,
                    iteration = run.iterations,
                    error = %e,
                    "Agent turn failed"
                );
                (APOLOGY.to_string(), TurnOutcome::Failed)
            }
        };

        // The stored user text never carries the context suffix.
        self.memories
            .append_exchange(&turn.session_id, &turn.message, &answer);
        track_turn(outcome.as_str());

        tracing::info!(
            session_id = %turn.session_id,
            outcome = outcome.as_str(),
            iterations = run.iterations,
            tool_calls = run.tool_calls,
            "Turn completed"
        );

        AgentReply {
            session_id: turn.session_id,
            answer,
            outcome,
            tool_calls: run.tool_calls,
        }
    }

    fn conversation_history(&self, session_id: &str) -> Vec<ConversationTurn> {
        self.memories.history(session_id)
    }

    fn reset_conversation(&self, session_id: &str) {
        tracing::info!(session_id = %session_id, "Conversation reset");
        self.memories.clear(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ReActBuilder;
    use shopdesk_core::mocks::{FailingLlm, MockLlm, MockToolRegistry, RecordingTool};
    use shopdesk_core::traits::Tool;

    fn controller(llm: Arc<dyn LlmClient>) -> (ReActController, Arc<RecordingTool>) {
        let tool = Arc::new(RecordingTool::new("order_status", "Look up an order.", "Order ORD001 is shipped."));
        let registry = MockToolRegistry::with_tools(vec![tool.clone() as Arc<dyn Tool>]);
        let controller = ReActBuilder::new()
            .with_llm(llm)
            .with_tools(Arc::new(registry))
            .build()
            .unwrap();
        (controller, tool)
    }

    #[tokio::test]
    async fn test_tool_then_answer() {
        let llm = Arc::new(MockLlm::new([
            "I need the order.\nAction: order_status\nAction Input: ORD001",
            "I know the status now.\nFinal Answer: Your order ORD001 has shipped.",
        ]));
        let (controller, tool) = controller(llm.clone());

        let reply = controller
            .process_message(AgentTurn::new("s1", "Where is ORD001?"))
            .await;

        assert_eq!(reply.answer, "Your order ORD001 has shipped.");
        assert_eq!(reply.outcome, TurnOutcome::Answered);
        assert_eq!(reply.tool_calls, 1);
        assert_eq!(tool.calls().len(), 1);

        let second_prompt = llm.last_prompt().unwrap();
        assert!(second_prompt.contains("Action Input: ORD001\nObservation: RESULT: Order ORD001 is shipped.\nThought: "));
    }

    #[tokio::test]
    async fn test_model_failure_becomes_apology() {
        let (controller, _) = controller(Arc::new(FailingLlm::new("connection refused")));

        let reply = controller.process_message(AgentTurn::new("s1", "Hi")).await;

        assert_eq!(reply.answer, APOLOGY);
        assert_eq!(reply.outcome, TurnOutcome::Failed);
        assert!(!reply.answer.contains("connection refused"));
        assert_eq!(controller.conversation_history("s1").len(), 2);
    }

    #[tokio::test]
    async fn test_empty_completion_is_retried() {
        let llm = Arc::new(MockLlm::new(["   ", "Final Answer: Hello there!"]));
        let (controller, _) = controller(llm.clone());

        let reply = controller.process_message(AgentTurn::new("s1", "Hi")).await;

        assert_eq!(reply.answer, "Hello there!");
        assert_eq!(llm.call_count(), 2);
        assert!(llm.last_prompt().unwrap().contains(INVALID_FORMAT));
    }

    #[test]
    fn test_config_from_agent_config() {
        let agent = AgentConfig {
            max_iterations: 3,
            llm_timeout_secs: 7,
            ..AgentConfig::default()
        };
        let config = ReActConfig::from(&agent);
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.memory_window, 10);
        assert_eq!(config.llm_timeout, Duration::from_secs(7));
    }
}
