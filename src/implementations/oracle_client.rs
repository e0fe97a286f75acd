use std::sync::Arc;
use std::time::{ Duration, Instant };

use async_trait::async_trait;
use log::{ debug, info, warn };
use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::errors::{ VizError, VizResult };
use crate::implementations::config::{ ConfigError, OracleConfig, Provider };
use crate::models::stage::{ PromptPair, StageKind, StageResult };
use crate::traits::oracle::Oracle;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("API error: {0}")] ApiError(String),

    #[error("Configuration error: {0}")] ConfigError(#[from] ConfigError),

    #[error("Failed to parse API response: {0}")] ParseError(String),

    #[error("Network error: {0}")] NetworkError(String),

    #[error("HTTP error: {status} - {message}")] HttpError {
        status: u16,
        message: String,
    },
}

impl From<OracleError> for VizError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::ConfigError(err) => err.into(),
            OracleError::HttpError { status, message } =>
                VizError::transport("LLM API", format!("Status {}: {}", status, message)),
            OracleError::ApiError(msg) |
            OracleError::ParseError(msg) |
            OracleError::NetworkError(msg) => VizError::transport("LLM API", msg),
        }
    }
}

/// Chat-completions request and response types
#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ChatResponseChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatResponseChoice>,
}

/// Anthropic messages request and response types
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client, OracleError> {
    reqwest::Client
        ::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| OracleError::NetworkError(format!("Failed to create HTTP client: {}", e)))
}

fn network_error(provider: &str, e: reqwest::Error) -> OracleError {
    let error_msg = format!("Network error when calling {} API: {}", provider, e);
    warn!("{}", error_msg);
    if e.is_timeout() {
        warn!("Request timed out");
    }
    if e.is_connect() {
        warn!("Connection error - check network connectivity");
    }
    OracleError::NetworkError(error_msg)
}

async fn read_success_body(response: reqwest::Response) -> Result<String, OracleError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let error_text = response
            .text().await
            .unwrap_or_else(|_| "Failed to get error message".to_string());

        warn!("API error: HTTP {} - {}", status, error_text);
        return Err(OracleError::HttpError {
            status,
            message: error_text,
        });
    }

    response.text().await.map_err(|e| {
        warn!("Failed to get response text: {}", e);
        OracleError::ParseError(e.to_string())
    })
}

/// Adapter for chat-completions style APIs (OpenAI, Azure OpenAI, Mistral, Together)
pub struct OpenAiCompatibleOracle {
    provider: Provider,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: usize,
    http_client: reqwest::Client,
}

impl OpenAiCompatibleOracle {
    pub fn new(
        provider: Provider,
        endpoint: String,
        model: String,
        api_key: String,
        config: &OracleConfig
    ) -> Result<Self, OracleError> {
        Ok(Self {
            provider,
            endpoint,
            model,
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            http_client: http_client(config.timeout_secs)?,
        })
    }

    async fn call(&self, system: &str, user: &str) -> Result<String, OracleError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                }
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("Sending request to {} endpoint {}", self.provider.as_str(), self.endpoint);

        let request_builder = match self.provider {
            Provider::Azure => self.http_client.post(&self.endpoint).header("api-key", &self.api_key),
            _ => self.http_client.post(&self.endpoint).bearer_auth(&self.api_key),
        };

        let response = request_builder
            .json(&request)
            .send().await
            .map_err(|e| network_error(self.provider.as_str(), e))?;

        let response_text = read_success_body(response).await?;
        debug!("Response length: {} characters", response_text.len());

        let parsed: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            warn!("Failed to parse response using structured approach: {}", e);
            OracleError::ParseError(format!("Failed to parse API response: {}", e))
        })?;

        parsed.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                warn!("API returned empty choices array");
                OracleError::ApiError("No response from API".to_string())
            })
    }
}

#[async_trait]
impl Oracle for OpenAiCompatibleOracle {
    async fn generate(&self, system: &str, user: &str) -> VizResult<String> {
        let content = self.call(system, user).await?;
        Ok(content.trim().to_string())
    }

    fn name(&self) -> String {
        format!("{}/{}", self.provider.as_str(), self.model)
    }
}

/// Adapter for the Anthropic messages API
pub struct AnthropicOracle {
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: usize,
    http_client: reqwest::Client,
}

impl AnthropicOracle {
    pub fn new(
        endpoint: String,
        model: String,
        api_key: String,
        config: &OracleConfig
    ) -> Result<Self, OracleError> {
        Ok(Self {
            endpoint,
            model,
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            http_client: http_client(config.timeout_secs)?,
        })
    }

    async fn call(&self, system: &str, user: &str) -> Result<String, OracleError> {
        let request = MessagesRequest {
            model: &self.model,
            system,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("Sending request to Anthropic endpoint {}", self.endpoint);

        let response = self.http_client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send().await
            .map_err(|e| network_error("Anthropic", e))?;

        let response_text = read_success_body(response).await?;
        debug!("Response length: {} characters", response_text.len());

        let parsed: MessagesResponse = serde_json::from_str(&response_text).map_err(|e| {
            warn!("JSON parsing error: {}", e);
            OracleError::ParseError(e.to_string())
        })?;

        let text: String = parsed.content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            warn!("No text content in Anthropic response");
            return Err(OracleError::ParseError("Missing text in Anthropic response content".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl Oracle for AnthropicOracle {
    async fn generate(&self, system: &str, user: &str) -> VizResult<String> {
        let content = self.call(system, user).await?;
        Ok(content.trim().to_string())
    }

    fn name(&self) -> String {
        format!("anthropic/{}", self.model)
    }
}

/// Build the oracle adapter named by `config.model`.
///
/// Unsupported providers, malformed model names and missing credentials are
/// configuration errors, reported here at startup rather than mid-run.
pub fn build_oracle(config: &OracleConfig) -> VizResult<Arc<dyn Oracle>> {
    let (provider, model) = config.provider_and_model()?;
    let api_key = config.resolve_api_key(provider)?;
    let endpoint = config.resolve_endpoint(provider)?;

    info!("Using {} provider with model {}", provider.as_str(), model);

    let oracle: Arc<dyn Oracle> = match provider {
        Provider::Anthropic => Arc::new(AnthropicOracle::new(endpoint, model, api_key, config)?),
        _ => Arc::new(OpenAiCompatibleOracle::new(provider, endpoint, model, api_key, config)?),
    };
    Ok(oracle)
}

/// Run one stage's oracle call, timing and logging it
pub async fn invoke_stage(
    oracle: &dyn Oracle,
    stage: StageKind,
    prompt: PromptPair
) -> VizResult<StageResult> {
    info!("Stage {}: calling {}", stage, oracle.name());
    debug!(
        "Stage {} prompt lengths: system {} / user {} characters",
        stage,
        prompt.system.len(),
        prompt.user.len()
    );

    let started = Instant::now();
    let text = oracle.generate(&prompt.system, &prompt.user).await?;
    let elapsed = started.elapsed();

    info!("Stage {} completed in {:.1}s", stage, elapsed.as_secs_f64());
    debug!("Stage {} response length: {} characters", stage, text.len());

    Ok(StageResult {
        stage,
        prompt,
        text,
        elapsed,
    })
}
