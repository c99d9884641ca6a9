use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use shopdesk_core::traits::Controller;
use shopdesk_core::types::{AgentReply, AgentTurn, ConversationTurn, ToolDefinition, TurnOutcome};
use shopdesk_gateway::{GatewayConfig, GatewayServer, QUICK_ACTIONS};
use shopdesk_store::context::CustomerContextStore;

/// Controller that echoes the message and the customer id it was given.
#[derive(Default)]
struct EchoController {
    turns: Mutex<Vec<AgentTurn>>,
}

#[async_trait]
impl Controller for EchoController {
    async fn process_message(&self, turn: AgentTurn) -> AgentReply {
        let customer = turn.context.get("customer_id").cloned().unwrap_or_default();
        let answer = format!("echo: {} [{}]", turn.message, customer);
        let session_id = turn.session_id.clone();
        self.turns.lock().unwrap().push(turn);
        AgentReply {
            session_id,
            answer,
            outcome: TurnOutcome::Answered,
            tool_calls: 0,
        }
    }

    fn conversation_history(&self, session_id: &str) -> Vec<ConversationTurn> {
        self.turns
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.session_id == session_id)
            .map(|t| ConversationTurn::user(t.message.clone()))
            .collect()
    }

    fn reset_conversation(&self, session_id: &str) {
        self.turns
            .lock()
            .unwrap()
            .retain(|t| t.session_id != session_id);
    }
}

fn app() -> (Router, Arc<EchoController>) {
    let controller = Arc::new(EchoController::default());
    let tools = vec![ToolDefinition {
        name: "order_status".into(),
        description: "Check an order.".into(),
        parameters: json!({"type": "object", "properties": {"order_id": {"type": "string"}}}),
    }];
    let server = GatewayServer::new(
        GatewayConfig::default(),
        controller.clone(),
        Arc::new(CustomerContextStore::new()),
        tools,
    );
    (server.build_router(), controller)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = app();
    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_tools_and_quick_actions_are_listed() {
    let (app, _) = app();

    let (status, tools) = send(&app, "GET", "/v1/tools", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tools[0]["name"], "order_status");

    let (status, actions) = send(&app, "GET", "/v1/quick-actions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(actions.as_array().unwrap().len(), QUICK_ACTIONS.len());
}

#[tokio::test]
async fn test_chat_mints_session_id() {
    let (app, _) = app();

    let (status, json) = send(&app, "POST", "/v1/chat", Some(json!({"message": "Hello"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "echo: Hello []");
    assert_eq!(json["outcome"], "answered");
    let session_id = json["session_id"].as_str().unwrap();
    assert_eq!(session_id.len(), 36);
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let (app, controller) = app();
    let (status, json) = send(&app, "POST", "/v1/chat", Some(json!({"message": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_REQUEST");
    assert!(controller.turns.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_context_flows_into_chat() {
    let (app, _) = app();

    let (status, json) = send(
        &app,
        "POST",
        "/v1/sessions/s1/login",
        Some(json!({"customer_id": "CUST001"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["context"]["customer_id"], "CUST001");

    let (_, json) = send(
        &app,
        "POST",
        "/v1/chat",
        Some(json!({"message": "Where is my order?", "session_id": "s1"})),
    )
    .await;
    assert_eq!(json["session_id"], "s1");
    assert_eq!(json["reply"], "echo: Where is my order? [CUST001]");

    let (_, json) = send(&app, "GET", "/v1/sessions/s1/context", None).await;
    assert_eq!(json["context"], json!({"customer_id": "CUST001"}));
}

#[tokio::test]
async fn test_login_validation() {
    let (app, _) = app();

    let (status, _) = send(&app, "POST", "/v1/sessions/s1/login", Some(json!({"email": "not-an-email"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/v1/sessions/s1/login", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        &app,
        "POST",
        "/v1/sessions/s1/login",
        Some(json!({"email": "john.smith@email.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["context"]["customer_email"], "john.smith@email.com");
}

#[tokio::test]
async fn test_quick_action_runs_canned_prompt() {
    let (app, _) = app();

    let (status, json) = send(
        &app,
        "POST",
        "/v1/quick-actions/track-package",
        Some(json!({"session_id": "s2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session_id"], "s2");
    assert_eq!(json["reply"], "echo: Can you help me track my package? []");

    let (status, json) = send(&app, "POST", "/v1/quick-actions/teleport", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_history_and_reset() {
    let (app, _) = app();

    send(&app, "POST", "/v1/chat", Some(json!({"message": "one", "session_id": "s3"}))).await;
    send(&app, "POST", "/v1/chat", Some(json!({"message": "two", "session_id": "s3"}))).await;

    let (_, json) = send(&app, "GET", "/v1/sessions/s3/history", None).await;
    let turns = json["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0]["content"], "one");
    assert_eq!(turns[0]["role"], "user");

    let (status, json) = send(&app, "POST", "/v1/sessions/s3/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reset"], true);

    let (_, json) = send(&app, "GET", "/v1/sessions/s3/history", None).await;
    assert!(json["turns"].as_array().unwrap().is_empty());
}
