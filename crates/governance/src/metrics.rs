//! Metrics implementation using Prometheus.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use shopdesk_core::{Error, Result};

/// Initialize Prometheus recorder and return the handle.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new();

    let handle = builder
        .install_recorder()
        .map_err(|e| Error::governance(format!("Failed to install Prometheus recorder: {}", e)))?;

    tracing::info!("Prometheus metrics recorder initialized");
    Ok(handle)
}

/// Helper to track HTTP request metrics (latency, count).
pub fn track_request(method: &str, path: &str, status: u16, latency_sec: f64) {
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(latency_sec);
}

/// Count one finished agent turn by how it ended.
pub fn track_turn(outcome: &str) {
    metrics::counter!("shopdesk_turns_total", "outcome" => outcome.to_string()).increment(1);
}

/// Count one tool invocation. `outcome` is `ok`, `rejected` or `error`.
pub fn track_tool_call(tool: &str, outcome: &str) {
    metrics::counter!(
        "shopdesk_tool_calls_total",
        "tool" => tool.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record the wall time of one model call.
pub fn track_llm_latency(model: &str, latency_sec: f64) {
    metrics::histogram!("shopdesk_llm_latency_seconds", "model" => model.to_string())
        .record(latency_sec);
}

/// Helper to track token usage.
pub fn track_tokens(model: &str, prompt: u64, completion: u64) {
    metrics::counter!("llm_token_usage_total", "model" => model.to_string(), "type" => "prompt").increment(prompt);
    metrics::counter!("llm_token_usage_total", "model" => model.to_string(), "type" => "completion").increment(completion);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_counters_are_rendered() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            track_turn("answered");
            track_turn("answered");
            track_tool_call("order_status", "ok");
            track_tokens("llama3.1", 120, 30);
        });

        let text = handle.render();
        assert!(text.contains("shopdesk_turns_total{outcome=\"answered\"} 2"));
        assert!(text.contains("shopdesk_tool_calls_total"));
        assert!(text.contains("tool=\"order_status\""));
        assert!(text.contains("llm_token_usage_total"));
    }

    #[test]
    fn test_tracking_without_recorder_is_noop() {
        track_turn("failed");
        track_llm_latency("mock", 0.01);
        track_request("GET", "/health", 200, 0.001);
    }
}
