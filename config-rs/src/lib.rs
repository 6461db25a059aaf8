//! config-rs/lib.rs
//! Shared configuration for the CodeCraft code generation service.
//! Provides port/address resolution plus the backend and history store settings.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

/// Default OpenAI-compatible chat completions endpoint
pub const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model used for code generation
pub const DEFAULT_LLM_MODEL: &str = "gpt-4";

/// Default port of the code generation service
pub const DEFAULT_CODEGEN_PORT: u16 = 8001;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(String),

    #[error("invalid value '{value}' for {var}")]
    Invalid { var: String, value: String },
}

/// Loads a `.env` file from the working directory if one exists.
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(_) => log::debug!("No .env file found, using process environment"),
    }
}

/// Port and bind address resolution for a named service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    service_name: String,
}

impl ServiceConfig {
    pub fn new(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
        }
    }

    fn env_prefix(&self) -> String {
        self.service_name.to_uppercase().replace('-', "_")
    }

    /// Reads `<NAME>_SERVICE_PORT`, falling back to `default_port`.
    pub fn get_service_port(&self, default_port: u16) -> u16 {
        let var_name = format!("{}_SERVICE_PORT", self.env_prefix());
        match env::var(&var_name) {
            Ok(value) => value.parse::<u16>().unwrap_or_else(|_| {
                log::warn!("Invalid port in {}, using default {}", var_name, default_port);
                default_port
            }),
            Err(_) => default_port,
        }
    }

    /// Reads `<NAME>_SERVICE_ADDR` (either `host:port` or `http://host:port`),
    /// falling back to all interfaces on the configured port.
    pub fn get_bind_address(&self, default_port: u16) -> SocketAddr {
        let var_name = format!("{}_SERVICE_ADDR", self.env_prefix());

        if let Ok(addr_str) = env::var(&var_name) {
            if let Some(addr) = parse_socket_addr(&addr_str) {
                return addr;
            }
            log::warn!("Invalid address format in {}, using default", var_name);
        }

        let port = self.get_service_port(default_port);
        SocketAddr::from(([0, 0, 0, 0], port))
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

fn parse_socket_addr(value: &str) -> Option<SocketAddr> {
    let stripped = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"))
        .unwrap_or(value);
    stripped.trim_end_matches('/').parse::<SocketAddr>().ok()
}

fn parse_or_default<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            var: var.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Settings for the generative backend.
///
/// An absent `api_key` puts the service in template-only mode.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_LLM_API_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            max_tokens: 2000,
            temperature: 0.1,
            timeout_secs: 60,
        }
    }
}

impl LlmSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let api_key = non_empty(lookup("LLM_API_KEY")).or_else(|| non_empty(lookup("OPENAI_API_KEY")));

        Ok(Self {
            api_key,
            api_url: non_empty(lookup("LLM_API_URL")).unwrap_or(defaults.api_url),
            model: non_empty(lookup("LLM_MODEL")).unwrap_or(defaults.model),
            max_tokens: parse_or_default(&lookup, "LLM_MAX_TOKENS", defaults.max_tokens)?,
            temperature: parse_or_default(&lookup, "LLM_TEMPERATURE", defaults.temperature)?,
            timeout_secs: parse_or_default(&lookup, "LLM_TIMEOUT_SECS", defaults.timeout_secs)?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Which history store implementation to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(ConfigError::Invalid {
                var: "HISTORY_STORE".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub connection_string: Option<String>,
}

impl StoreSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Postgres is the default backend and requires `DATABASE_URL`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match non_empty(lookup("HISTORY_STORE")) {
            Some(value) => value.parse::<StoreBackend>()?,
            None => StoreBackend::Postgres,
        };
        let connection_string = non_empty(lookup("DATABASE_URL"));

        if backend == StoreBackend::Postgres && connection_string.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL".to_string()));
        }

        Ok(Self {
            backend,
            connection_string,
        })
    }

    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            connection_string: None,
        }
    }
}
