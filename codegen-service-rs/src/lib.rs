//! CodeCraft code generation service.
//!
//! Generates, debugs, explains and optimizes source code through a generative
//! backend, falling back to deterministic templates whenever the backend is not
//! configured or fails. Requests and responses are recorded in a history store.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, DefaultBodyLimit, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod invoker;
pub mod languages;
pub mod llm_client;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod prompt;
pub mod storage;
pub mod templates;
pub mod validation;

#[cfg(test)]
mod tests;

pub use error::{CodegenError, ErrorResponse, Operation};
pub use invoker::BackendInvoker;
pub use orchestrator::CodegenOrchestrator;
pub use storage::{create_history_store, HistoryStore, InMemoryHistoryStore};

use models::{
    CodeRequest, CodeResponse, DebugCodeRequest, DebugCodeResponse, ExplainCodeRequest, ExplainCodeResponse,
    GenerateCodeRequest, HistoryQuery, OptimizeCodeRequest, OptimizeCodeResponse,
};
use validation::payload_limit_config;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: u64,
    pub status: String,
    pub backend_configured: bool,
}

/// HTTP front of the orchestrator
pub struct CodegenGateway {
    orchestrator: CodegenOrchestrator,
    started_at: Instant,
}

impl CodegenGateway {
    pub fn new(orchestrator: CodegenOrchestrator) -> Self {
        Self {
            orchestrator,
            started_at: Instant::now(),
        }
    }

    pub fn orchestrator(&self) -> &CodegenOrchestrator {
        &self.orchestrator
    }

    /// Create the Axum router with all routes and middleware
    pub fn create_router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/api", get(Self::root_handler))
            .route("/api/", get(Self::root_handler))
            .route("/api/generate-code", post(Self::generate_code_handler))
            .route("/api/debug-code", post(Self::debug_code_handler))
            .route("/api/optimize-code", post(Self::optimize_code_handler))
            .route("/api/explain-code", post(Self::explain_code_handler))
            .route("/api/code-history", get(Self::code_history_handler))
            .route("/api/supported-languages", get(Self::supported_languages_handler))
            .layer(DefaultBodyLimit::disable())
            .layer(payload_limit_config())
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .with_state(self)
    }

    async fn root_handler() -> impl IntoResponse {
        Json(serde_json::json!({
            "message": "CodeCraft API - AI-powered code generation platform"
        }))
    }

    async fn health_handler(State(state): State<Arc<Self>>) -> impl IntoResponse {
        let store_healthy = state.orchestrator.store().is_healthy().await;
        let backend_configured = state.orchestrator.has_backend();

        let status = match (store_healthy, backend_configured) {
            (true, true) => "SERVING",
            (true, false) => "DEGRADED",
            (false, _) => "CRITICAL",
        };

        Json(HealthResponse {
            healthy: store_healthy,
            service_name: "codegen-service".to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            status: status.to_string(),
            backend_configured,
        })
    }

    /// POST /api/generate-code
    async fn generate_code_handler(
        State(state): State<Arc<Self>>,
        payload: Result<Json<GenerateCodeRequest>, JsonRejection>,
    ) -> Result<Json<CodeResponse>, CodegenError> {
        let Json(request) = payload?;
        Ok(Json(state.orchestrator.generate(request).await?))
    }

    /// POST /api/debug-code
    async fn debug_code_handler(
        State(state): State<Arc<Self>>,
        payload: Result<Json<DebugCodeRequest>, JsonRejection>,
    ) -> Result<Json<DebugCodeResponse>, CodegenError> {
        let Json(request) = payload?;
        Ok(Json(state.orchestrator.debug(request).await?))
    }

    /// POST /api/optimize-code
    async fn optimize_code_handler(
        State(state): State<Arc<Self>>,
        payload: Result<Json<OptimizeCodeRequest>, JsonRejection>,
    ) -> Result<Json<OptimizeCodeResponse>, CodegenError> {
        let Json(request) = payload?;
        Ok(Json(state.orchestrator.optimize(request).await?))
    }

    /// POST /api/explain-code
    async fn explain_code_handler(
        State(state): State<Arc<Self>>,
        payload: Result<Json<ExplainCodeRequest>, JsonRejection>,
    ) -> Result<Json<ExplainCodeResponse>, CodegenError> {
        let Json(request) = payload?;
        Ok(Json(state.orchestrator.explain(request).await?))
    }

    /// GET /api/code-history?limit=N
    async fn code_history_handler(
        State(state): State<Arc<Self>>,
        query: Result<Query<HistoryQuery>, QueryRejection>,
    ) -> Result<Json<Vec<CodeRequest>>, CodegenError> {
        let Query(query) = query?;
        Ok(Json(state.orchestrator.history(query.limit).await?))
    }

    /// GET /api/supported-languages
    async fn supported_languages_handler(State(state): State<Arc<Self>>) -> impl IntoResponse {
        Json(state.orchestrator.supported_languages())
    }
}
