use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::storage::StoreError;

/// Operation category named in persistence error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Debug,
    Optimize,
    Explain,
    History,
}

impl Operation {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Generate => "Code generation failed",
            Operation::Debug => "Debug failed",
            Operation::Optimize => "Optimization failed",
            Operation::Explain => "Explanation failed",
            Operation::History => "Failed to retrieve history",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("{}: {source}", .operation.failure_message())]
    Persistence {
        operation: Operation,
        #[source]
        source: StoreError,
    },
}

impl CodegenError {
    pub fn validation(message: impl Into<String>) -> Self {
        CodegenError::Validation(message.into())
    }

    pub fn persistence(operation: Operation, source: StoreError) -> Self {
        CodegenError::Persistence { operation, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CodegenError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CodegenError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for CodegenError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            CodegenError::Validation(_) => log::warn!("{}", self),
            CodegenError::Persistence { .. } => log::error!("{}", self),
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                code: status.as_u16(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_message_names_operation() {
        let err = CodegenError::persistence(
            Operation::History,
            StoreError::Configuration("pool closed".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Failed to retrieve history: store configuration error: pool closed"
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_status() {
        let err = CodegenError::validation("prompt is required");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
