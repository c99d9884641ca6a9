#![deny(unused)]
//! Core types, traits, and error definitions for ShopDesk.
//!
//! This crate provides the foundational building blocks shared across all layers
//! of the customer-service agent: the tool contract, the model client contract,
//! the conversation types and the process configuration.

pub mod config;
pub mod error;
pub mod mocks;
pub mod template;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::*;
pub use types::*;
