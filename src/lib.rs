pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
pub mod server;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::{ OutputPaths, PipelineOptions, PipelineVariant };
pub use errors::{ RecoverableError, VizError, VizResult };
pub use implementations::{
    config::{ AgentConfig, OracleConfig, PredictionApiConfig, Provider },
    oracle_client::build_oracle,
    pipeline::GenerationPipeline,
    prediction_client::HttpPredictionApi,
    prompts::PromptTemplates,
    repair::{ DefectRepairer, RepairContext },
    sample_synthesizer::SampleSynthesizer,
    section_extractor::extract_specs,
};
pub use models::{
    artifact::{ Artifact, DesignDocument, VerifiedExample, SENTINEL },
    outcome::{ PipelineOutcome, RepairOutcome, RepairReport },
    spec_triple::SpecTriple,
    stage::{ StageDescriptor, StageKind },
    task::TaskDescription,
};
pub use traits::{ Oracle, PredictionApi, PredictionResponse };
