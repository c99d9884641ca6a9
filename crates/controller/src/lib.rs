#![deny(unused)]
//! Agent controller for ShopDesk.
//!
//! This crate provides the ReAct loop that turns one customer message into
//! one reply: prompt rendering, output parsing, tool execution and the
//! per-session conversation memory.

pub mod builder;
pub mod executor;
pub mod memory;
pub mod parser;
pub mod prompt;
pub mod react;

pub use builder::ReActBuilder;
pub use executor::ToolExecutor;
pub use memory::{ConversationMemory, SessionMemories};
pub use parser::{ActionInput, ActionParser, ParsedStep, ToolInvocation};
pub use prompt::{PromptVars, DEFAULT_PROMPT};
pub use react::{AgentState, ReActConfig, ReActController, APOLOGY};
