#![deny(unused)]
//! HTTP gateway for ShopDesk.
//!
//! This crate exposes the agent over a JSON API: chat turns, canned quick
//! actions, session history, customer login and the metrics endpoint.

pub mod quick_actions;
pub mod server;

pub use quick_actions::{QuickAction, QUICK_ACTIONS};
pub use server::{AppState, GatewayConfig, GatewayServer};
