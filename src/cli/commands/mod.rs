use std::sync::Arc;

use anyhow::{ anyhow, Result };

use vizagent::config::{ PipelineOptions, PipelineVariant };
use vizagent::errors::VizResult;
use vizagent::implementations::config::AgentConfig;
use vizagent::implementations::oracle_client::build_oracle;
use vizagent::implementations::pipeline::GenerationPipeline;
use vizagent::implementations::prediction_client::HttpPredictionApi;
use vizagent::implementations::prompts::PromptTemplates;

pub mod generate;
pub mod repair;
pub mod sample;
pub mod extract;
pub mod serve;
pub mod stages;

/// Parse a `--variant` flag, falling back to the configured variant
pub fn parse_variant(value: Option<&str>, default: PipelineVariant) -> Result<PipelineVariant> {
    match value {
        Some(value) => value.parse::<PipelineVariant>().map_err(|e| anyhow!(e)),
        None => Ok(default),
    }
}

/// Wire the oracle, the prediction API client and the prompt set from configuration
pub fn build_pipeline(config: &AgentConfig, options: PipelineOptions) -> VizResult<GenerationPipeline> {
    let oracle = build_oracle(&config.oracle)?;
    let prediction_api = Arc::new(HttpPredictionApi::new(&config.prediction_api)?);
    let prompts = PromptTemplates::with_overrides(&config.prompt_templates)?;
    Ok(GenerationPipeline::new(oracle, prediction_api, prompts, options))
}
