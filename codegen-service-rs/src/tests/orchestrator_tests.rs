use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CodegenError;
use crate::invoker::BackendInvoker;
use crate::llm_client::MockCompletionBackend;
use crate::models::{
    CodeRequest, CodeResponse, DebugCodeRequest, ExplainCodeRequest, GenerateCodeRequest, OptimizationType,
    OptimizeCodeRequest, RequestType,
};
use crate::orchestrator::CodegenOrchestrator;
use crate::storage::{HistoryStore, InMemoryHistoryStore, StoreError, StoreResult};

/// Store that rejects every write and read
struct UnavailableStore;

#[async_trait]
impl HistoryStore for UnavailableStore {
    async fn initialize(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        false
    }

    async fn insert_request(&self, _request: &CodeRequest) -> StoreResult<()> {
        Err(StoreError::Configuration("store offline".to_string()))
    }

    async fn insert_response(&self, _response: &CodeResponse) -> StoreResult<()> {
        Err(StoreError::Configuration("store offline".to_string()))
    }

    async fn recent_requests(&self, _limit: usize) -> StoreResult<Vec<CodeRequest>> {
        Err(StoreError::Configuration("store offline".to_string()))
    }

    async fn close(&self) {}
}

fn template_orchestrator() -> (CodegenOrchestrator, Arc<InMemoryHistoryStore>) {
    let store = Arc::new(InMemoryHistoryStore::new());
    let orchestrator = CodegenOrchestrator::new(BackendInvoker::template_only(), store.clone());
    (orchestrator, store)
}

fn generate_payload(prompt: &str, language: Option<&str>) -> GenerateCodeRequest {
    GenerateCodeRequest {
        prompt: Some(prompt.to_string()),
        language: language.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_generate_persists_request_and_response() {
    let (orchestrator, store) = template_orchestrator();

    let response = orchestrator
        .generate(generate_payload("create a function to sort a list", Some("python")))
        .await
        .unwrap();

    let requests = store.requests().await;
    let responses = store.responses().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0], response);
    assert_eq!(response.request_id, requests[0].id);
    assert_eq!(requests[0].request_type, RequestType::Generate);
    assert_eq!(requests[0].language, "python");
    assert_eq!(response.explanation, "Generated function template");
}

#[tokio::test]
async fn test_generate_defaults_language_and_drops_blank_code() {
    let (orchestrator, store) = template_orchestrator();

    let response = orchestrator
        .generate(GenerateCodeRequest {
            prompt: Some("hello".to_string()),
            code_input: Some("   ".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.language, "javascript");
    let requests = store.requests().await;
    assert!(requests[0].code_input.is_none());
}

#[tokio::test]
async fn test_missing_fields_are_validation_errors() {
    let (orchestrator, store) = template_orchestrator();

    let err = orchestrator.generate(GenerateCodeRequest::default()).await.unwrap_err();
    assert!(matches!(err, CodegenError::Validation(_)));

    let err = orchestrator
        .debug(DebugCodeRequest {
            code: Some("x = 1".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("language"));

    let err = orchestrator
        .explain(ExplainCodeRequest {
            language: Some("go".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("code"));

    assert!(store.requests().await.is_empty());
}

#[tokio::test]
async fn test_store_failure_surfaces_operation_message() {
    let orchestrator = CodegenOrchestrator::new(BackendInvoker::template_only(), Arc::new(UnavailableStore));

    let err = orchestrator
        .generate(generate_payload("anything", None))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.to_string().starts_with("Code generation failed"));

    let err = orchestrator
        .optimize(OptimizeCodeRequest {
            code: Some("x".to_string()),
            language: Some("python".to_string()),
            optimization_type: None,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Optimization failed"));

    let err = orchestrator.history(None).await.unwrap_err();
    assert!(err.to_string().starts_with("Failed to retrieve history"));
}

#[tokio::test]
async fn test_history_is_newest_first_and_limited() {
    let (orchestrator, _store) = template_orchestrator();

    for i in 0..5 {
        orchestrator
            .generate(generate_payload(&format!("prompt {}", i), Some("go")))
            .await
            .unwrap();
    }

    let history = orchestrator.history(Some(3)).await.unwrap();
    let prompts: Vec<&str> = history.iter().map(|r| r.prompt.as_str()).collect();
    assert_eq!(prompts, vec!["prompt 4", "prompt 3", "prompt 2"]);

    assert_eq!(orchestrator.history(None).await.unwrap().len(), 5);
    assert!(orchestrator.history(Some(0)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_debug_and_optimize_shapes() {
    let (orchestrator, store) = template_orchestrator();

    let debug = orchestrator
        .debug(DebugCodeRequest {
            code: Some("def f(:".to_string()),
            language: Some("python".to_string()),
            error_message: Some("SyntaxError".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(debug.original_code, "def f(:");
    assert_eq!(debug.language, "python");
    assert!(!debug.fixed_code.is_empty());

    let optimize = orchestrator
        .optimize(OptimizeCodeRequest {
            code: Some("for x in xs: pass".to_string()),
            language: Some("python".to_string()),
            optimization_type: Some(OptimizationType::Readability),
        })
        .await
        .unwrap();
    assert_eq!(optimize.optimization_type, OptimizationType::Readability);
    assert_eq!(optimize.original_code, "for x in xs: pass");

    let requests = store.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].prompt, "Debug this python code that gives this error: SyntaxError");
    assert_eq!(requests[0].code_input.as_deref(), Some("def f(:"));
    assert_eq!(requests[1].prompt, "Optimize this python code for readability");
    assert_eq!(store.responses().await.len(), 2);
}

#[tokio::test]
async fn test_explain_uses_backend_text_as_explanation() {
    let mut backend = MockCompletionBackend::new();
    backend
        .expect_complete()
        .times(1)
        .returning(|_, _| Ok("This loop prints each item.".to_string()));

    let store = Arc::new(InMemoryHistoryStore::new());
    let orchestrator = CodegenOrchestrator::new(BackendInvoker::new(Some(Arc::new(backend))), store.clone());
    assert!(orchestrator.has_backend());

    let explained = orchestrator
        .explain(ExplainCodeRequest {
            code: Some("for i in items: print(i)".to_string()),
            language: Some("python".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(explained.explanation, "This loop prints each item.");
    assert_eq!(explained.code, "for i in items: print(i)");
    assert_eq!(store.requests().await[0].request_type, RequestType::Explain);
}

#[tokio::test]
async fn test_unsupported_language_gets_placeholder() {
    let (orchestrator, _store) = template_orchestrator();

    let response = orchestrator
        .generate(generate_payload("parse a config file", Some("haskell")))
        .await
        .unwrap();

    assert!(response.generated_code.starts_with("-- Haskell code for: parse a config file"));
    assert_eq!(response.explanation, crate::templates::GENERIC_EXPLANATION);
}
