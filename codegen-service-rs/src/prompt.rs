//! Mode-specific prompt construction for the generative backend.

use crate::models::RequestType;

/// Marker that opens the issue description in debug-mode output
pub const ISSUE_MARKER: &str = "ISSUE:";

/// Marker that opens the corrected code in debug-mode output
pub const FIXED_CODE_MARKER: &str = "FIXED CODE:";

/// System instruction and user message sent to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub system: String,
    pub user: String,
}

pub fn system_instruction(request_type: RequestType, language: &str) -> String {
    match request_type {
        RequestType::Generate => format!(
            "You are an expert {language} developer. Generate clean, production-ready code based on the user's request.\n\
             Provide complete, functional, idiomatic code with proper error handling, comments, and best practices.\n\
             Return only the code without explanations unless specifically asked."
        ),
        RequestType::Debug => format!(
            "You are an expert {language} debugger. Analyze the provided code and fix any issues.\n\
             Explain what was wrong and provide the corrected version.\n\
             Format your response as: {ISSUE_MARKER} [explanation] {FIXED_CODE_MARKER} [corrected code]"
        ),
        RequestType::Explain => format!(
            "You are an expert {language} developer. Explain the provided code in detail.\n\
             Break down what each part does, explain the logic, and provide insights about best practices."
        ),
        RequestType::Optimize => format!(
            "You are an expert {language} developer. Optimize the provided code for better performance, readability, and maintainability.\n\
             Explain the optimizations made and provide the improved version."
        ),
    }
}

/// The prompt alone, or the prompt followed by the code fenced and labelled with the language.
pub fn user_message(prompt: &str, language: &str, code_input: Option<&str>) -> String {
    match code_input {
        Some(code) => format!("{prompt}\n\nCode to work with:\n```{language}\n{code}\n```"),
        None => prompt.to_string(),
    }
}

pub fn build_prompt(
    request_type: RequestType,
    language: &str,
    prompt: &str,
    code_input: Option<&str>,
) -> BuiltPrompt {
    BuiltPrompt {
        system: system_instruction(request_type, language),
        user: user_message(prompt, language, code_input),
    }
}

pub fn debug_prompt(language: &str, error_message: Option<&str>) -> String {
    let mut prompt = format!("Debug this {} code", language);
    if let Some(message) = error_message.filter(|m| !m.trim().is_empty()) {
        prompt.push_str(&format!(" that gives this error: {}", message));
    }
    prompt
}

pub fn optimize_prompt(language: &str, goal: &str) -> String {
    format!("Optimize this {} code for {}", language, goal)
}

pub const EXPLAIN_PROMPT: &str = "Explain this code in detail";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_instruction_carries_markers() {
        let system = system_instruction(RequestType::Debug, "rust");
        assert!(system.contains("expert rust debugger"));
        assert!(system.contains("ISSUE:"));
        assert!(system.contains("FIXED CODE:"));
    }

    #[test]
    fn test_generate_user_message_is_prompt_alone() {
        let built = build_prompt(RequestType::Generate, "go", "write a web server", None);
        assert_eq!(built.user, "write a web server");
        assert!(built.system.contains("production-ready"));
    }

    #[test]
    fn test_code_input_is_fenced_with_language() {
        let built = build_prompt(RequestType::Optimize, "python", "Optimize this", Some("x = [i for i in range(3)]"));
        assert_eq!(
            built.user,
            "Optimize this\n\nCode to work with:\n```python\nx = [i for i in range(3)]\n```"
        );
        assert!(built.system.contains("Explain the optimizations"));
    }

    #[test]
    fn test_explain_has_no_output_contract() {
        let system = system_instruction(RequestType::Explain, "java");
        assert!(!system.contains(FIXED_CODE_MARKER));
    }

    #[test]
    fn test_synthesized_prompts() {
        assert_eq!(debug_prompt("go", None), "Debug this go code");
        assert_eq!(debug_prompt("go", Some("   ")), "Debug this go code");
        assert_eq!(
            debug_prompt("go", Some("nil pointer dereference")),
            "Debug this go code that gives this error: nil pointer dereference"
        );
        assert_eq!(optimize_prompt("rust", "security"), "Optimize this rust code for security");
    }
}
