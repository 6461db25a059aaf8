// codegen-service-rs/src/main.rs
// CodeCraft code generation service - HTTP entry point
// Port 8001 by default (CODEGEN_SERVICE_PORT / CODEGEN_SERVICE_ADDR override)
//
// Startup:
// - Loads .env and initializes logging
// - Connects the history store (DATABASE_URL required unless HISTORY_STORE=memory)
// - Builds the LLM client when an API key is configured, otherwise runs template-only
// - Serves until Ctrl-C / SIGTERM, then closes the store

use std::sync::Arc;

use codegen_service::llm_client::{CompletionBackend, LLMClient};
use codegen_service::{create_history_store, BackendInvoker, CodegenGateway, CodegenOrchestrator};
use config_rs::{LlmSettings, ServiceConfig, StoreSettings, DEFAULT_CODEGEN_PORT};

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config_rs::load_dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let service_config = ServiceConfig::new("codegen");
    let llm_settings = LlmSettings::from_env()?;
    let store_settings = StoreSettings::from_env()?;

    let store = create_history_store(&store_settings).await?;

    let backend: Option<Arc<dyn CompletionBackend>> = match LLMClient::from_settings(&llm_settings) {
        Some(client) => {
            log::info!("Using LLM provider: {}", client.provider());
            Some(Arc::new(client))
        }
        None => {
            log::warn!("No LLM API key configured; serving template-based generation only");
            None
        }
    };

    let orchestrator = CodegenOrchestrator::new(BackendInvoker::new(backend), store.clone());
    let app = Arc::new(CodegenGateway::new(orchestrator)).create_router();

    let addr = service_config.get_bind_address(DEFAULT_CODEGEN_PORT);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("CodeCraft API listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.close().await;
    served?;

    Ok(())
}
