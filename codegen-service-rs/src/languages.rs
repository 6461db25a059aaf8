//! Static catalog of supported target languages.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct SupportedLanguages {
    pub languages: &'static [LanguageInfo],
}

const fn lang(id: &'static str, name: &'static str, extensions: &'static [&'static str]) -> LanguageInfo {
    LanguageInfo { id, name, extensions }
}

pub const SUPPORTED_LANGUAGES: &[LanguageInfo] = &[
    lang("javascript", "JavaScript", &[".js", ".jsx"]),
    lang("typescript", "TypeScript", &[".ts", ".tsx"]),
    lang("python", "Python", &[".py"]),
    lang("react", "React", &[".jsx", ".tsx"]),
    lang("html", "HTML", &[".html"]),
    lang("css", "CSS", &[".css"]),
    lang("sql", "SQL", &[".sql"]),
    lang("json", "JSON", &[".json"]),
    lang("bash", "Bash", &[".sh"]),
    lang("nodejs", "Node.js", &[".js"]),
    lang("php", "PHP", &[".php"]),
    lang("java", "Java", &[".java"]),
    lang("csharp", "C#", &[".cs"]),
    lang("go", "Go", &[".go"]),
    lang("rust", "Rust", &[".rs"]),
];

pub fn supported_languages() -> SupportedLanguages {
    SupportedLanguages {
        languages: SUPPORTED_LANGUAGES,
    }
}
