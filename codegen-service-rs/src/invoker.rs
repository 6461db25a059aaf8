//! Backend invocation with template fallback.
//!
//! [`BackendInvoker::invoke`] always produces a result: a missing backend or any
//! backend failure is logged and answered by the template selector instead.

use std::sync::Arc;

use crate::llm_client::{CompletionBackend, LLMError};
use crate::models::{GenerationResult, RequestType};
use crate::normalizer::{MarkerNormalizer, ResponseNormalizer};
use crate::prompt;
use crate::templates;

/// Everything the invoker needs for one call
#[derive(Debug, Clone, Copy)]
pub struct InvocationInput<'a> {
    pub request_type: RequestType,
    pub language: &'a str,
    pub prompt: &'a str,
    pub code_input: Option<&'a str>,
}

#[derive(Clone)]
pub struct BackendInvoker {
    backend: Option<Arc<dyn CompletionBackend>>,
    normalizer: Arc<dyn ResponseNormalizer>,
}

impl BackendInvoker {
    pub fn new(backend: Option<Arc<dyn CompletionBackend>>) -> Self {
        Self {
            backend,
            normalizer: Arc::new(MarkerNormalizer),
        }
    }

    /// Template-only invoker, used when no credential is configured.
    pub fn template_only() -> Self {
        Self::new(None)
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn ResponseNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn invoke(&self, input: InvocationInput<'_>) -> GenerationResult {
        let Some(backend) = &self.backend else {
            log::debug!(
                "No backend configured; using template for {} request in {}",
                input.request_type,
                input.language
            );
            return self.fallback(&input);
        };

        let built = prompt::build_prompt(input.request_type, input.language, input.prompt, input.code_input);

        match backend.complete(&built.system, &built.user).await {
            Ok(raw) => self.normalizer.normalize(&raw, input.request_type),
            Err(err) => {
                log_backend_failure(&err, &input);
                self.fallback(&input)
            }
        }
    }

    fn fallback(&self, input: &InvocationInput<'_>) -> GenerationResult {
        templates::select_template(input.prompt, input.language, input.request_type)
    }
}

fn log_backend_failure(err: &LLMError, input: &InvocationInput<'_>) {
    match err {
        LLMError::RateLimitExceeded(_) | LLMError::ServerError(_) | LLMError::NetworkError(_) => log::warn!(
            "AI generation error ({} request, language {}): {}; falling back to template",
            input.request_type,
            input.language,
            err
        ),
        _ => log::error!(
            "AI generation error ({} request, language {}): {}; falling back to template",
            input.request_type,
            input.language,
            err
        ),
    }
}
