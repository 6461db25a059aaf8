//! Converts raw backend text into a structured `{code, explanation}` result.
//!
//! The debug contract is purely textual (`ISSUE:` ... `FIXED CODE:` ...), so it is
//! kept behind [`ResponseNormalizer`]; a structured backend format can replace it
//! without touching the invoker or the orchestrator. Normalization never fails:
//! anything that does not match the expected shape is treated as code.

use crate::models::{GenerationResult, RequestType};
use crate::prompt::{FIXED_CODE_MARKER, ISSUE_MARKER};

pub const GENERATED_EXPLANATION: &str = "Code generated successfully";
pub const UNSTRUCTURED_DEBUG_EXPLANATION: &str =
    "Code analyzed; the response did not separate the issue from the fix, so it is returned as-is";

pub trait ResponseNormalizer: Send + Sync {
    fn normalize(&self, raw: &str, request_type: RequestType) -> GenerationResult;
}

/// Marker-based normalizer for the `ISSUE:` / `FIXED CODE:` contract
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerNormalizer;

impl ResponseNormalizer for MarkerNormalizer {
    fn normalize(&self, raw: &str, request_type: RequestType) -> GenerationResult {
        match request_type {
            RequestType::Debug => split_debug_output(raw).unwrap_or_else(|| {
                log::warn!("Debug response is missing the '{}' marker; returning it as code", FIXED_CODE_MARKER);
                GenerationResult::from_backend(raw, UNSTRUCTURED_DEBUG_EXPLANATION)
            }),
            _ => GenerationResult::from_backend(raw, GENERATED_EXPLANATION),
        }
    }
}

/// Splits on the first `FIXED CODE:`; `None` when the marker is absent.
fn split_debug_output(raw: &str) -> Option<GenerationResult> {
    let (issue, fixed) = raw.split_once(FIXED_CODE_MARKER)?;
    let issue = issue.trim();
    let explanation = issue.strip_prefix(ISSUE_MARKER).unwrap_or(issue).trim();
    let code = fixed.trim();

    // TODO: surface a distinct explanation when the backend puts FIXED CODE: before any ISSUE: text
    let explanation = if explanation.is_empty() {
        UNSTRUCTURED_DEBUG_EXPLANATION
    } else {
        explanation
    };

    Some(GenerationResult::from_backend(code, explanation))
}
