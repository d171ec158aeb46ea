use crate::workflows::knowledge::{CorpusMode, DEFAULT_DOCUMENTS};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the advisor service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub knowledge: KnowledgeConfig,
    pub model: ModelConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let knowledge = KnowledgeConfig::from_env()?;
        let model = ModelConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            knowledge,
            model,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter and formatting controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Location and refresh policy of the knowledge base documents.
#[derive(Debug, Clone)]
pub struct KnowledgeConfig {
    pub directory: PathBuf,
    pub documents: Vec<String>,
    pub mode: CorpusMode,
}

impl KnowledgeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let directory = PathBuf::from(env::var("KB_DIR").unwrap_or_else(|_| "kb".to_string()));

        let mode = match env::var("KB_MODE") {
            Ok(raw) => CorpusMode::parse(&raw).ok_or(ConfigError::InvalidCorpusMode(raw))?,
            Err(_) => CorpusMode::Reload,
        };

        Ok(Self {
            directory,
            documents: DEFAULT_DOCUMENTS.iter().map(|name| name.to_string()).collect(),
            mode,
        })
    }
}

/// Hosted language model settings.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            model: "gemini-flash-latest".to_string(),
            temperature: 0.0,
            max_output_tokens: 512,
            timeout_secs: 30,
        }
    }
}

impl ModelConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            api_base: env::var("GEMINI_API_BASE").unwrap_or(defaults.api_base),
            api_key,
            model: env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            temperature: parse_var("GEMINI_TEMPERATURE", defaults.temperature)?,
            max_output_tokens: parse_var("GEMINI_MAX_OUTPUT_TOKENS", defaults.max_output_tokens)?,
            timeout_secs: parse_var("GEMINI_TIMEOUT_SECS", defaults.timeout_secs)?,
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCorpusMode(String),
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCorpusMode(value) => {
                write!(f, "KB_MODE must be 'reload' or 'cached', got '{value}'")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be numeric, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCorpusMode(_)
            | ConfigError::InvalidNumber { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "KB_DIR",
            "KB_MODE",
            "GEMINI_API_KEY",
            "GOOGLE_API_KEY",
            "GEMINI_API_BASE",
            "GEMINI_MODEL",
            "GEMINI_TEMPERATURE",
            "GEMINI_MAX_OUTPUT_TOKENS",
            "GEMINI_TIMEOUT_SECS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.knowledge.directory, PathBuf::from("kb"));
        assert_eq!(config.knowledge.mode, CorpusMode::Reload);
        assert_eq!(config.knowledge.documents.len(), DEFAULT_DOCUMENTS.len());
        assert_eq!(config.model.model, "gemini-flash-latest");
        assert_eq!(config.model.max_output_tokens, 512);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn reads_knowledge_and_model_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("KB_DIR", "/srv/kb");
        env::set_var("KB_MODE", "cached");
        env::set_var("GOOGLE_API_KEY", "secret");
        env::set_var("GEMINI_TEMPERATURE", "0.2");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.knowledge.directory, PathBuf::from("/srv/kb"));
        assert_eq!(config.knowledge.mode, CorpusMode::Cached);
        assert_eq!(config.model.api_key.as_deref(), Some("secret"));
        assert!((config.model.temperature - 0.2).abs() < f32::EPSILON);
        reset_env();
    }

    #[test]
    fn rejects_invalid_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("KB_MODE", "sometimes");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidCorpusMode(_))
        ));

        reset_env();
        env::set_var("GEMINI_MAX_OUTPUT_TOKENS", "lots");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNumber {
                key: "GEMINI_MAX_OUTPUT_TOKENS",
                ..
            })
        ));
        reset_env();
    }
}
