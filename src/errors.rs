use thiserror::Error;

/// Service name used for failures of the task's prediction API
pub const PREDICTION_API_SERVICE: &str = "prediction API";
/// Context name used when the oracle's sample payload is not valid JSON
pub const SAMPLE_SYNTHESIS_CONTEXT: &str = "sample synthesis";

/// Custom error types for the VizAgent pipeline
#[derive(Debug, Error)]
pub enum VizError {
    /// A call to the oracle or the prediction API could not complete
    #[error("Transport failure calling {service}: {message}")]
    TransportFailure { service: String, message: String },

    /// The oracle did not follow the requested output structure
    #[error("Malformed output from {context}: {message}")]
    MalformedOutput { context: String, message: String, text: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid task description: {0}")]
    InvalidTask(String),

    #[error("Template error: {0}")]
    Template(String),

    /// A stage ran before the stages it depends on produced their output
    #[error("Pipeline state error: {0}")]
    PipelineState(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VizError {
    pub fn transport(service: impl Into<String>, message: impl Into<String>) -> Self {
        VizError::TransportFailure {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn malformed(
        context: impl Into<String>,
        message: impl Into<String>,
        text: impl Into<String>
    ) -> Self {
        VizError::MalformedOutput {
            context: context.into(),
            message: message.into(),
            text: text.into(),
        }
    }

    /// The offending oracle text for `MalformedOutput`, if any
    pub fn offending_text(&self) -> Option<&str> {
        match self {
            VizError::MalformedOutput { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Result type specific to VizAgent operations
pub type VizResult<T> = Result<T, VizError>;

/// Recoverable vs. non-recoverable errors
pub trait RecoverableError {
    /// True when the pipeline may continue with a degraded value instead of aborting
    fn is_recoverable(&self) -> bool;
    fn recovery_strategy(&self) -> Option<String>;
}

impl RecoverableError for VizError {
    fn is_recoverable(&self) -> bool {
        match self {
            VizError::TransportFailure { service, .. } => service == PREDICTION_API_SERVICE,
            VizError::MalformedOutput { context, .. } => context == SAMPLE_SYNTHESIS_CONTEXT,
            _ => false,
        }
    }

    fn recovery_strategy(&self) -> Option<String> {
        match self {
            VizError::TransportFailure { service, .. } =>
                Some(format!("Check network connectivity and the {} endpoint, then rerun", service)),
            VizError::MalformedOutput { .. } =>
                Some(
                    "The model did not follow the requested format; rerun or adjust the prompt templates".to_string()
                ),
            VizError::Configuration(_) =>
                Some(
                    "Set the provider API key (e.g. OPENAI_API_KEY) in the environment or .env, or fix the model name in the config file".to_string()
                ),
            VizError::InvalidTask(_) =>
                Some(
                    "The task file must be a YAML mapping with task_description.description".to_string()
                ),
            VizError::Template(_) =>
                Some("Check the prompt_templates section of the config file".to_string()),
            VizError::PipelineState(_) | VizError::Io(_) => None,
        }
    }
}
