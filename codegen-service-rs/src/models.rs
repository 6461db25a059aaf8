//! Request and response records plus the per-operation API payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_LANGUAGE: &str = "javascript";
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Operation mode; governs prompt construction and output parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    #[default]
    Generate,
    Debug,
    Explain,
    Optimize,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Generate => "generate",
            RequestType::Debug => "debug",
            RequestType::Explain => "explain",
            RequestType::Optimize => "optimize",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(RequestType::Generate),
            "debug" => Ok(RequestType::Debug),
            "explain" => Ok(RequestType::Explain),
            "optimize" => Ok(RequestType::Optimize),
            other => Err(format!("unknown request type: {}", other)),
        }
    }
}

/// Optimization goal for the optimize operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationType {
    #[default]
    Performance,
    Readability,
    Security,
}

impl OptimizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationType::Performance => "performance",
            OptimizationType::Readability => "readability",
            OptimizationType::Security => "security",
        }
    }
}

/// One user-submitted operation, persisted once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeRequest {
    pub id: String,
    pub prompt: String,
    pub language: String,
    pub request_type: RequestType,
    pub code_input: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl CodeRequest {
    pub fn new(
        prompt: impl Into<String>,
        language: impl Into<String>,
        request_type: RequestType,
        code_input: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            language: language.into(),
            request_type,
            code_input,
            timestamp: Utc::now(),
        }
    }
}

/// Result of processing a [`CodeRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeResponse {
    pub id: String,
    pub request_id: String,
    pub generated_code: String,
    pub explanation: String,
    pub language: String,
    pub timestamp: DateTime<Utc>,
}

impl CodeResponse {
    pub fn for_request(request: &CodeRequest, result: &GenerationResult) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            request_id: request.id.clone(),
            generated_code: result.code.clone(),
            explanation: result.explanation.clone(),
            language: request.language.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Where a [`GenerationResult`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Backend,
    Template,
}

/// Normalized `{code, explanation}` pair produced by the backend or the template selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub code: String,
    pub explanation: String,
    pub source: ResultSource,
}

impl GenerationResult {
    pub fn from_backend(code: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            explanation: explanation.into(),
            source: ResultSource::Backend,
        }
    }

    pub fn from_template(code: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            explanation: explanation.into(),
            source: ResultSource::Template,
        }
    }
}

// Inbound payloads. Required fields are optional here so that the orchestrator
// can report missing input with its own validation error.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateCodeRequest {
    pub prompt: Option<String>,
    pub language: Option<String>,
    pub request_type: Option<RequestType>,
    pub code_input: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DebugCodeRequest {
    pub code: Option<String>,
    pub language: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptimizeCodeRequest {
    pub code: Option<String>,
    pub language: Option<String>,
    pub optimization_type: Option<OptimizationType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExplainCodeRequest {
    pub code: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

// Outbound payloads

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugCodeResponse {
    pub original_code: String,
    pub fixed_code: String,
    pub explanation: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizeCodeResponse {
    pub original_code: String,
    pub optimized_code: String,
    pub explanation: String,
    pub language: String,
    pub optimization_type: OptimizationType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainCodeResponse {
    pub code: String,
    pub explanation: String,
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_type_wire_format() {
        assert_eq!(serde_json::to_string(&RequestType::Optimize).unwrap(), "\"optimize\"");
        let parsed: RequestType = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(parsed, RequestType::Debug);
        assert!(serde_json::from_str::<RequestType>("\"refactor\"").is_err());
        assert_eq!("explain".parse::<RequestType>(), Ok(RequestType::Explain));
    }

    #[test]
    fn test_response_references_request() {
        let request = CodeRequest::new("add numbers", "python", RequestType::Generate, None);
        let result = GenerationResult::from_template("def add(a, b): return a + b", "template");
        let response = CodeResponse::for_request(&request, &result);

        assert_eq!(response.request_id, request.id);
        assert_ne!(response.id, request.id);
        assert_eq!(response.language, "python");
        assert_eq!(response.generated_code, result.code);
    }

    #[test]
    fn test_generate_payload_defaults() {
        let payload: GenerateCodeRequest = serde_json::from_str(r#"{"prompt": "hello"}"#).unwrap();
        assert_eq!(payload.prompt.as_deref(), Some("hello"));
        assert!(payload.language.is_none());
        assert!(payload.request_type.is_none());
        assert_eq!(OptimizationType::default().as_str(), "performance");
    }
}
