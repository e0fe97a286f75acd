use std::time::Duration;

use async_trait::async_trait;
use log::{ debug, warn };
use serde_json::Value;

use crate::errors::{ VizError, VizResult, PREDICTION_API_SERVICE };
use crate::implementations::config::PredictionApiConfig;
use crate::traits::prediction_api::{ PredictionApi, PredictionResponse };

/// `PredictionApi` over plain HTTP
#[derive(Clone)]
pub struct HttpPredictionApi {
    http_client: reqwest::Client,
}

impl HttpPredictionApi {
    pub fn new(config: &PredictionApiConfig) -> VizResult<Self> {
        let http_client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VizError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionApi {
    async fn post_json(&self, url: &str, payload: &Value) -> VizResult<PredictionResponse> {
        debug!("POST {}", url);
        let response = self.http_client
            .post(url)
            .json(payload)
            .send().await
            .map_err(|e| {
                warn!("Prediction API request to {} failed: {}", url, e);
                VizError::transport(PREDICTION_API_SERVICE, e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response
            .text().await
            .map_err(|e| VizError::transport(PREDICTION_API_SERVICE, e.to_string()))?;
        debug!("Prediction API answered {} with {} bytes", status, body.len());

        Ok(PredictionResponse { status, body })
    }
}
