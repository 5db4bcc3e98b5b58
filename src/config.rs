use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Default hosted summarization model queried when `HF_MODEL` is unset.
pub const DEFAULT_HF_MODEL: &str = "facebook/bart-large-cnn";
/// Default base URL of the hosted inference API.
pub const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co";
/// Default base URL of the local model runtime.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Default model served by the local runtime.
pub const DEFAULT_LOCAL_MODEL: &str = "llama3.2";
/// Default character budget per chunk.
pub const DEFAULT_CHUNK_MAX_CHARS: usize = 1800;
/// Default number of key-point bullets.
pub const DEFAULT_BULLET_COUNT: usize = 5;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Study Helper server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Access token for the hosted inference API; enables the remote backend when present.
    pub hf_api_token: Option<String>,
    /// Hosted summarization model identifier.
    pub hf_model: String,
    /// Base URL of the hosted inference API.
    pub hf_api_url: String,
    /// Base URL of the local Ollama runtime.
    pub ollama_url: String,
    /// Model name served by the local runtime.
    pub local_model: String,
    /// Character budget used when chunking cleaned text.
    pub chunk_max_chars: usize,
    /// Maximum number of key-point bullets in the output.
    pub bullet_count: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Directory holding the optional web UI (`index.html` and `static/`).
    pub web_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset, so `HF_API_TOKEN=""` keeps the remote backend off.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            hf_api_token: optional("HF_API_TOKEN").map(|token| token.trim().to_string()),
            hf_model: optional("HF_MODEL")
                .map(|model| model.trim().to_string())
                .unwrap_or_else(|| DEFAULT_HF_MODEL.to_string()),
            hf_api_url: optional("HF_API_URL").unwrap_or_else(|| DEFAULT_HF_API_URL.to_string()),
            ollama_url: optional("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            local_model: optional("LOCAL_MODEL")
                .unwrap_or_else(|| DEFAULT_LOCAL_MODEL.to_string()),
            chunk_max_chars: parse_positive(
                "CHUNK_MAX_CHARS",
                optional("CHUNK_MAX_CHARS"),
                DEFAULT_CHUNK_MAX_CHARS,
            )?,
            bullet_count: parse_positive(
                "BULLET_COUNT",
                optional("BULLET_COUNT"),
                DEFAULT_BULLET_COUNT,
            )?,
            server_port: optional("SERVER_PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            web_dir: optional("WEB_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("web")),
        })
    }

    /// Whether the hosted inference backend should be attempted first.
    pub fn remote_enabled(&self) -> bool {
        self.hf_api_token.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hf_api_token: None,
            hf_model: DEFAULT_HF_MODEL.to_string(),
            hf_api_url: DEFAULT_HF_API_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            local_model: DEFAULT_LOCAL_MODEL.to_string(),
            chunk_max_chars: DEFAULT_CHUNK_MAX_CHARS,
            bullet_count: DEFAULT_BULLET_COUNT,
            server_port: None,
            web_dir: PathBuf::from("web"),
        }
    }
}

fn parse_positive(key: &str, value: Option<String>, default: usize) -> Result<usize, ConfigError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::InvalidValue(key.to_string())),
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment and install it in the global cache.
///
/// Subsequent calls return the cached value without re-reading the environment.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        remote_enabled = config.remote_enabled(),
        hf_model = %config.hf_model,
        local_model = %config.local_model,
        chunk_max_chars = config.chunk_max_chars,
        bullet_count = config.bullet_count,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
