#![deny(unused)]
//! ShopDesk - customer service agent for an online store.
//!
//! Wires the mock stores, the tool registry, the model client and the ReAct
//! controller together and serves them over HTTP.

use std::sync::Arc;

use shopdesk_controller::{ReActConfig, ReActController};
use shopdesk_core::{config::AppConfig, template::PromptTemplate, traits::ToolRegistry};
use shopdesk_gateway::{GatewayConfig, GatewayServer};
use shopdesk_model_gateway::{create_client_from_config, OllamaClient};
use shopdesk_store::{context::CustomerContextStore, MockStores};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    shopdesk_governance::configure_tracing(config.observability.json_logs)?;

    tracing::info!("Starting ShopDesk v{}", env!("CARGO_PKG_VERSION"));

    // =========================================================================
    // Stores & Tools
    // =========================================================================
    let stores = MockStores::seeded();
    let registry = Arc::new(shopdesk_skills::builtin_registry(&stores, &config.weather)?);
    let tools = registry.list();

    tracing::info!(
        tools_count = tools.len(),
        weather_api = config.weather.usable_api_key().is_some(),
        "Tool registry initialized"
    );

    // =========================================================================
    // Model
    // =========================================================================
    let llm = create_client_from_config(&config.model)?;

    if config.model.provider.eq_ignore_ascii_case("ollama") {
        let ollama = OllamaClient::from_config(&config.model);
        match ollama.health_check().await {
            Ok(tags) if ollama.has_model(&tags) => {
                tracing::info!(model = %config.model.model, "Model server reachable");
            }
            Ok(tags) => {
                tracing::warn!(
                    model = %config.model.model,
                    available = ?tags,
                    "Model not pulled on the model server; run `ollama pull` first"
                );
            }
            Err(e) => {
                tracing::warn!(
                    base_url = %config.model.base_url,
                    error = %e,
                    "Model server unreachable; chat turns will return an apology until it is up"
                );
            }
        }
    }

    // =========================================================================
    // Controller
    // =========================================================================
    let mut builder = ReActController::builder()
        .with_config(ReActConfig::from(&config.agent))
        .with_llm(llm)
        .with_tools(registry);

    if let Some(path) = &config.agent.prompt_path {
        tracing::info!(path = %path.display(), "Loading prompt template override");
        builder = builder.with_prompt(PromptTemplate::from_file(path)?);
    }

    let controller = Arc::new(builder.build()?);
    tracing::info!(
        max_iterations = config.agent.max_iterations,
        memory_window = config.agent.memory_window,
        "Controller initialized"
    );

    // =========================================================================
    // Gateway
    // =========================================================================
    let gateway_config = GatewayConfig::from(&config.server);
    let mut server = GatewayServer::new(
        gateway_config.clone(),
        controller,
        Arc::new(CustomerContextStore::new()),
        tools,
    );

    if config.observability.metrics {
        server = server.with_metrics(shopdesk_governance::setup_metrics_recorder()?);
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  ShopDesk v{:<50}║", env!("CARGO_PKG_VERSION"));
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  Endpoints:                                                  ║");
    println!("║    GET  /health                    - Health check            ║");
    println!("║    GET  /v1/tools                  - Tool descriptors        ║");
    println!("║    POST /v1/chat                   - Chat with the agent     ║");
    println!("║    GET  /v1/quick-actions          - Canned prompts          ║");
    println!("║    POST /v1/sessions/:id/login     - Customer login          ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  Model: {:<53}║", format!("{} ({})", config.model.model, config.model.provider));
    println!("║  Server: http://{:<45}║", format!("{}:{}", gateway_config.host, gateway_config.port));
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    server.run().await?;

    Ok(())
}
