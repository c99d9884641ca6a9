//! Core traits for ShopDesk.
//!
//! Traits are organized by layer:
//! - `controller`: the agent turn contract used by the gateway
//! - `skills`: Tool and ToolRegistry
//! - `llm`: LlmClient

pub mod controller;
pub mod llm;
pub mod skills;

pub use controller::*;
pub use llm::*;
pub use skills::*;
