use async_trait::async_trait;
use serde_json::Value;

use crate::errors::VizResult;

/// Status and raw body returned by a prediction endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionResponse {
    pub status: u16,
    pub body: String,
}

impl PredictionResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// The task's external prediction API
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// POST `payload` as JSON to `url`. Only transport failures are errors;
    /// any HTTP status comes back as a response.
    async fn post_json(&self, url: &str, payload: &Value) -> VizResult<PredictionResponse>;
}
