//! Test modules for the code generation service
//!
//! - `llm_mock_tests`: LLM client against a WireMock backend
//! - `invoker_tests`: fallback and normalization through a mocked backend
//! - `orchestrator_tests`: per-operation pipeline, persistence and error paths

mod llm_mock_tests;
mod orchestrator_tests;
