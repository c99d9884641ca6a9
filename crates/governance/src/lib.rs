#![deny(unused)]
//! Observability for ShopDesk.
//!
//! This crate provides:
//! - Log and trace subscriber setup (stdout plus optional OTLP export)
//! - Prometheus metrics recorder and the counters the agent emits

pub mod metrics;
pub mod tracing_layer;

pub use metrics::{
    setup_metrics_recorder, track_llm_latency, track_request, track_tokens, track_tool_call,
    track_turn,
};
pub use tracing_layer::configure_tracing;
