use serde::{ Deserialize, Serialize };
use std::collections::HashMap;
use std::fs;
use std::path::{ Path, PathBuf };
use thiserror::Error;

use crate::config::{
    OutputPaths,
    PipelineOptions,
    PipelineVariant,
    DEFAULT_GENERATED_PATH,
    DEFAULT_REPAIRED_PATH,
    DEFAULT_UPLOADS_DIR,
};
use crate::errors::VizError;

/// Environment variable that overrides `oracle.model`
pub const MODEL_ENV_VAR: &str = "VIZAGENT_MODEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required API key: {0}")]
    MissingApiKey(String),

    #[error("Unsupported model provider: {0}")]
    UnsupportedProvider(String),

    #[error("Invalid model name '{0}', expected provider/model")]
    InvalidModelName(String),

    #[error("Missing API endpoint for provider {0}")]
    MissingEndpoint(String),
}

impl From<ConfigError> for VizError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::FileReadError(e) => VizError::Io(e),
            other => VizError::Configuration(other.to_string()),
        }
    }
}

/// Oracle backends the client knows how to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Azure,
    Mistral,
    Together,
}

impl Provider {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            "azure" => Ok(Provider::Azure),
            "mistral" => Ok(Provider::Mistral),
            "together" => Ok(Provider::Together),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }

    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Azure => "AZURE_OPENAI_API_KEY",
            Provider::Mistral => "MISTRAL_API_KEY",
            Provider::Together => "TOGETHER_API_KEY",
        }
    }

    /// Endpoint used when the config does not name one
    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("https://api.openai.com/v1/chat/completions"),
            Provider::Anthropic => Some("https://api.anthropic.com/v1/messages"),
            Provider::Mistral => Some("https://api.mistral.ai/v1/chat/completions"),
            Provider::Together => Some("https://api.together.xyz/v1/chat/completions"),
            Provider::Azure => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Azure => "azure",
            Provider::Mistral => "mistral",
            Provider::Together => "together",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OracleConfig {
    /// `provider/model`, e.g. `openai/gpt-4o`
    pub model: String,

    /// API key; falls back to the provider's environment variable
    pub api_key: Option<String>,

    /// Overrides the provider's default endpoint
    pub api_endpoint: Option<String>,

    pub temperature: f32,

    pub max_tokens: usize,

    /// HTTP timeout per oracle call
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: "openai/gpt-4o".to_string(),
            api_key: None,
            api_endpoint: None,
            temperature: 0.0,
            max_tokens: 4096,
            timeout_secs: 300,
        }
    }
}

impl OracleConfig {
    /// Split `model` into its provider and provider-side model name
    pub fn provider_and_model(&self) -> Result<(Provider, String), ConfigError> {
        let (provider, model) = self.model
            .split_once('/')
            .filter(|(p, m)| !p.is_empty() && !m.is_empty())
            .ok_or_else(|| ConfigError::InvalidModelName(self.model.clone()))?;
        Ok((Provider::parse(provider)?, model.to_string()))
    }

    /// Get the API key, checking the provider's environment variable if not in config
    pub fn resolve_api_key(&self, provider: Provider) -> Result<String, ConfigError> {
        use log::debug;

        if let Some(api_key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from config");
            return Ok(api_key.clone());
        }

        let env_var = provider.api_key_env_var();
        match std::env::var(env_var) {
            Ok(key) if !key.trim().is_empty() => {
                debug!("Using API key from {}", env_var);
                Ok(key)
            }
            _ => Err(ConfigError::MissingApiKey(format!("{} is not set", env_var))),
        }
    }

    /// Endpoint to call for `provider`
    pub fn resolve_endpoint(&self, provider: Provider) -> Result<String, ConfigError> {
        self.api_endpoint
            .clone()
            .or_else(|| provider.default_endpoint().map(str::to_string))
            .ok_or_else(|| ConfigError::MissingEndpoint(provider.as_str().to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PredictionApiConfig {
    pub timeout_secs: u64,
}

impl Default for PredictionApiConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineSettings {
    pub variant: PipelineVariant,
    pub concurrent_example: bool,
    pub repair: bool,
    pub generated_path: PathBuf,
    pub repaired_path: PathBuf,
    pub uploads_dir: PathBuf,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            variant: PipelineVariant::Extended,
            concurrent_example: true,
            repair: true,
            generated_path: PathBuf::from(DEFAULT_GENERATED_PATH),
            repaired_path: PathBuf::from(DEFAULT_REPAIRED_PATH),
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
        }
    }
}

impl PipelineSettings {
    pub fn to_options(&self) -> PipelineOptions {
        PipelineOptions {
            variant: self.variant,
            concurrent_example: self.concurrent_example,
            output: OutputPaths {
                generated: self.generated_path.clone(),
                repaired: self.repaired_path.clone(),
            },
            repair: self.repair,
        }
    }
}

/// Process-wide configuration, built once at startup and read-only afterwards
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AgentConfig {
    pub oracle: OracleConfig,

    pub prediction_api: PredictionApiConfig,

    pub pipeline: PipelineSettings,

    /// Prompt template overrides, keyed by template name
    pub prompt_templates: HashMap<String, String>,
}

impl AgentConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise defaults; then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(model) = std::env::var(MODEL_ENV_VAR) {
            if !model.trim().is_empty() {
                log::info!("Using model {} from {}", model, MODEL_ENV_VAR);
                config.oracle.model = model;
            }
        }
        Ok(config)
    }
}
