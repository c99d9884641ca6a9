//! Axum-based HTTP server for the gateway.

use axum::{
    extract::{Json, MatchedPath, Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use metrics_exporter_prometheus::PrometheusHandle;
use shopdesk_core::{
    config::ServerConfig,
    traits::Controller,
    types::{AgentTurn, ContextRecord, ConversationTurn, ToolDefinition, TurnOutcome},
    Error, Result,
};
use shopdesk_governance::track_request;
use shopdesk_store::context::CustomerContextStore;

use crate::quick_actions::{self, QuickAction, QUICK_ACTIONS};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Enable CORS.
    pub enable_cors: bool,
    /// Enable request tracing.
    pub enable_tracing: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for GatewayConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            enable_cors: config.enable_cors,
            enable_tracing: true,
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Agent answering chat turns.
    pub controller: Arc<dyn Controller>,
    /// Per-session customer metadata.
    pub contexts: Arc<CustomerContextStore>,
    /// Tool descriptors, listed verbatim by `/v1/tools`.
    pub tools: Vec<ToolDefinition>,
}

/// Gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
    state: Arc<AppState>,
    metrics_handle: Option<PrometheusHandle>,
}

impl GatewayServer {
    /// Create a new gateway server.
    pub fn new(
        config: GatewayConfig,
        controller: Arc<dyn Controller>,
        contexts: Arc<CustomerContextStore>,
        tools: Vec<ToolDefinition>,
    ) -> Self {
        Self {
            config,
            state: Arc::new(AppState {
                controller,
                contexts,
                tools,
            }),
            metrics_handle: None,
        }
    }

    /// Set metrics handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Build the Axum router.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/v1/tools", get(tools_handler))
            .route("/v1/chat", post(chat_handler))
            .route("/v1/quick-actions", get(quick_actions_handler))
            .route("/v1/quick-actions/:id", post(quick_action_handler))
            .route("/v1/sessions/:id/history", get(history_handler))
            .route("/v1/sessions/:id/reset", post(reset_handler))
            .route("/v1/sessions/:id/context", get(context_handler))
            .route("/v1/sessions/:id/login", post(login_handler))
            .route_layer(middleware::from_fn(track_http))
            .with_state(self.state.clone());

        if let Some(handle) = &self.metrics_handle {
            let handle = handle.clone();
            router = router.route("/metrics", get(move || async move { handle.render() }));
        }

        if self.config.enable_cors {
            router = router.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));
        }

        if self.config.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::gateway(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!(addr = %addr, "Gateway server starting");

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| Error::gateway(format!("Server error: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Message content.
    pub message: String,
    /// Optional session ID. A new one is minted when absent.
    pub session_id: Option<String>,
}

/// Body of a quick-action request.
#[derive(Debug, Default, Deserialize)]
pub struct QuickActionRequest {
    pub session_id: Option<String>,
}

/// Chat response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    /// Agent reply text.
    pub reply: String,
    pub outcome: TurnOutcome,
    pub tool_calls: usize,
}

/// Login request. One of the two fields is required.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub customer_id: Option<String>,
    pub email: Option<String>,
}

/// Session context response.
#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub session_id: String,
    pub context: ContextRecord,
}

/// Session history response.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub turns: Vec<ConversationTurn>,
}

/// Reset response.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub session_id: String,
    pub reset: bool,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

/// Handler error rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "INVALID_REQUEST",
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "NOT_FOUND",
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                code: self.code.to_string(),
                message: self.message,
            }),
        )
            .into_response()
    }
}

// =============================================================================
// Middleware
// =============================================================================

/// Request count and latency by matched route.
async fn track_http(matched: Option<MatchedPath>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = matched
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    track_request(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn tools_handler(State(state): State<Arc<AppState>>) -> Json<Vec<ToolDefinition>> {
    Json(state.tools.clone())
}

async fn quick_actions_handler() -> Json<&'static [QuickAction]> {
    Json(&QUICK_ACTIONS[..])
}

/// Chat handler.
async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> std::result::Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::bad_request("Message must not be empty"));
    }
    let session_id = session_or_new(payload.session_id);

    tracing::info!(
        session_id = %session_id,
        message_len = payload.message.len(),
        "Processing chat request"
    );

    Ok(Json(run_turn(&state, session_id, payload.message).await))
}

async fn quick_action_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Option<Json<QuickActionRequest>>,
) -> std::result::Result<Json<ChatResponse>, ApiError> {
    let action = quick_actions::find(&id)
        .ok_or_else(|| ApiError::not_found(format!("Unknown quick action '{}'", id)))?;
    let session_id = session_or_new(payload.and_then(|Json(body)| body.session_id));

    tracing::info!(session_id = %session_id, action = %action.id, "Running quick action");

    Ok(Json(run_turn(&state, session_id, action.prompt.to_string()).await))
}

async fn history_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<HistoryResponse> {
    let turns = state.controller.conversation_history(&session_id);
    Json(HistoryResponse { session_id, turns })
}

async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<ResetResponse> {
    state.controller.reset_conversation(&session_id);
    Json(ResetResponse {
        session_id,
        reset: true,
    })
}

async fn context_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<ContextResponse> {
    let context = state.contexts.get_context(&session_id);
    Json(ContextResponse {
        session_id,
        context,
    })
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<LoginRequest>,
) -> std::result::Result<Json<ContextResponse>, ApiError> {
    let customer_id = non_blank(payload.customer_id);
    let email = non_blank(payload.email);

    if customer_id.is_none() && email.is_none() {
        return Err(ApiError::bad_request("Provide a customer_id or an email"));
    }
    if let Some(email) = &email {
        if !email.contains('@') {
            return Err(ApiError::bad_request("Please enter a valid email address"));
        }
    }

    if let Some(customer_id) = &customer_id {
        state.contexts.set_customer_id(&session_id, customer_id);
    }
    if let Some(email) = &email {
        state.contexts.set_customer_email(&session_id, email);
    }
    tracing::info!(session_id = %session_id, by_id = customer_id.is_some(), "Customer logged in");

    let context = state.contexts.get_context(&session_id);
    Ok(Json(ContextResponse {
        session_id,
        context,
    }))
}

async fn run_turn(state: &AppState, session_id: String, message: String) -> ChatResponse {
    let context = state.contexts.get_context(&session_id);
    let reply = state
        .controller
        .process_message(AgentTurn::new(session_id, message).with_context(context))
        .await;

    ChatResponse {
        session_id: reply.session_id,
        reply: reply.answer,
        outcome: reply.outcome,
        tool_calls: reply.tool_calls,
    }
}

fn session_or_new(session_id: Option<String>) -> String {
    non_blank(session_id).unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
