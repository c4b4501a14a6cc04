use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_GENERATION_MODEL: &str = "llama3.2";
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Configuration was installed more than once.
    #[error("Configuration already initialized")]
    AlreadyInitialized,
}

/// Runtime configuration for the student records server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    pub server_port: u16,
    /// Base URL of the Ollama runtime used for summaries.
    pub ollama_url: String,
    /// Model identifier sent with every generation request.
    pub generation_model: String,
    /// Transport timeout, in seconds, for a single generation request.
    pub generation_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            generation_timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            server_port: parse_env_optional("SERVER_PORT")?.unwrap_or(defaults.server_port),
            ollama_url: load_env_optional("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            generation_model: load_env_optional("GENERATION_MODEL")
                .unwrap_or(defaults.generation_model),
            generation_timeout_secs: parse_env_optional("GENERATION_TIMEOUT_SECS")?
                .unwrap_or(defaults.generation_timeout_secs),
        })
    }

    /// Timeout applied to outbound generation requests.
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        server_port = config.server_port,
        ollama_url = %config.ollama_url,
        model = %config.generation_model,
        timeout_secs = config.generation_timeout_secs,
        "Loaded configuration"
    );
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    Ok(get_config())
}
