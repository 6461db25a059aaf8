//! Per-operation entry points.
//!
//! Each operation validates its input, records a [`CodeRequest`], runs the
//! backend-or-template pipeline, records the [`CodeResponse`] and shapes the
//! result. The request write completes before the response write starts since
//! the response references the request id. Only store failures surface as errors.

use std::sync::Arc;

use crate::error::{CodegenError, Operation};
use crate::invoker::{BackendInvoker, InvocationInput};
use crate::languages::{self, SupportedLanguages};
use crate::models::{
    CodeRequest, CodeResponse, DebugCodeRequest, DebugCodeResponse, ExplainCodeRequest, ExplainCodeResponse,
    GenerateCodeRequest, GenerationResult, OptimizeCodeRequest, OptimizeCodeResponse, RequestType, ResultSource,
    DEFAULT_HISTORY_LIMIT, DEFAULT_LANGUAGE,
};
use crate::prompt;
use crate::storage::HistoryStore;

pub struct CodegenOrchestrator {
    invoker: BackendInvoker,
    store: Arc<dyn HistoryStore>,
}

fn required(value: Option<String>, field: &str) -> Result<String, CodegenError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(CodegenError::validation(format!("field '{}' is required", field))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CodegenOrchestrator {
    pub fn new(invoker: BackendInvoker, store: Arc<dyn HistoryStore>) -> Self {
        Self { invoker, store }
    }

    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }

    pub fn has_backend(&self) -> bool {
        self.invoker.has_backend()
    }

    /// Persist request, invoke, persist response.
    async fn run(
        &self,
        request: CodeRequest,
        operation: Operation,
    ) -> Result<(CodeResponse, GenerationResult), CodegenError> {
        log::info!(
            "Processing {} request {} (language: {})",
            request.request_type,
            request.id,
            request.language
        );

        self.store
            .insert_request(&request)
            .await
            .map_err(|e| CodegenError::persistence(operation, e))?;

        let result = self
            .invoker
            .invoke(InvocationInput {
                request_type: request.request_type,
                language: &request.language,
                prompt: &request.prompt,
                code_input: request.code_input.as_deref(),
            })
            .await;

        let response = CodeResponse::for_request(&request, &result);
        self.store
            .insert_response(&response)
            .await
            .map_err(|e| CodegenError::persistence(operation, e))?;

        Ok((response, result))
    }

    #[tracing::instrument(skip_all, fields(operation = "generate"))]
    pub async fn generate(&self, payload: GenerateCodeRequest) -> Result<CodeResponse, CodegenError> {
        let prompt = required(payload.prompt, "prompt")?;
        let language = non_blank(payload.language).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let request_type = payload.request_type.unwrap_or_default();

        let request = CodeRequest::new(prompt, language, request_type, non_blank(payload.code_input));
        let (response, _) = self.run(request, Operation::Generate).await?;
        Ok(response)
    }

    #[tracing::instrument(skip_all, fields(operation = "debug"))]
    pub async fn debug(&self, payload: DebugCodeRequest) -> Result<DebugCodeResponse, CodegenError> {
        let code = required(payload.code, "code")?;
        let language = required(payload.language, "language")?;
        let prompt = prompt::debug_prompt(&language, payload.error_message.as_deref());

        let request = CodeRequest::new(prompt, language.clone(), RequestType::Debug, Some(code.clone()));
        let (_, result) = self.run(request, Operation::Debug).await?;

        Ok(DebugCodeResponse {
            original_code: code,
            fixed_code: result.code,
            explanation: result.explanation,
            language,
        })
    }

    #[tracing::instrument(skip_all, fields(operation = "optimize"))]
    pub async fn optimize(&self, payload: OptimizeCodeRequest) -> Result<OptimizeCodeResponse, CodegenError> {
        let code = required(payload.code, "code")?;
        let language = required(payload.language, "language")?;
        let optimization_type = payload.optimization_type.unwrap_or_default();
        let prompt = prompt::optimize_prompt(&language, optimization_type.as_str());

        let request = CodeRequest::new(prompt, language.clone(), RequestType::Optimize, Some(code.clone()));
        let (_, result) = self.run(request, Operation::Optimize).await?;

        Ok(OptimizeCodeResponse {
            original_code: code,
            optimized_code: result.code,
            explanation: result.explanation,
            language,
            optimization_type,
        })
    }

    #[tracing::instrument(skip_all, fields(operation = "explain"))]
    pub async fn explain(&self, payload: ExplainCodeRequest) -> Result<ExplainCodeResponse, CodegenError> {
        let code = required(payload.code, "code")?;
        let language = required(payload.language, "language")?;

        let request = CodeRequest::new(prompt::EXPLAIN_PROMPT, language.clone(), RequestType::Explain, Some(code.clone()));
        let (_, result) = self.run(request, Operation::Explain).await?;

        // The backend's walkthrough is the explanation; templates carry their own.
        let explanation = match result.source {
            ResultSource::Backend => result.code,
            ResultSource::Template => result.explanation,
        };

        Ok(ExplainCodeResponse {
            code,
            explanation,
            language,
        })
    }

    pub async fn history(&self, limit: Option<usize>) -> Result<Vec<CodeRequest>, CodegenError> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.store
            .recent_requests(limit)
            .await
            .map_err(|e| CodegenError::persistence(Operation::History, e))
    }

    pub fn supported_languages(&self) -> SupportedLanguages {
        languages::supported_languages()
    }
}
