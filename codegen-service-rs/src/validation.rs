//! Request shape validation for the HTTP surface.
//!
//! Extractor rejections (malformed JSON, unknown enum values, bad query strings)
//! are reported as validation failures in the service's uniform error body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::CodegenError;

/// Default maximum request payload size (10MB)
pub const MAX_PAYLOAD_SIZE: usize = 10 * 1024 * 1024;

pub fn payload_limit_config() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_PAYLOAD_SIZE)
}

impl From<JsonRejection> for CodegenError {
    fn from(rejection: JsonRejection) -> Self {
        CodegenError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for CodegenError {
    fn from(rejection: QueryRejection) -> Self {
        CodegenError::validation(rejection.body_text())
    }
}
