//! Core type definitions for ShopDesk.
//!
//! Broken down into submodules by concern.

pub mod agent;
pub mod conversation;
pub mod tool;

pub use agent::*;
pub use conversation::*;
pub use tool::*;
