pub mod config;
pub mod oracle_client;
pub mod prediction_client;
pub mod section_extractor;
pub mod prompts;
pub mod sample_synthesizer;
pub mod repair;
pub mod pipeline;

pub use config::AgentConfig;
pub use oracle_client::{ build_oracle, invoke_stage };
pub use prediction_client::HttpPredictionApi;
pub use section_extractor::extract_specs;
pub use prompts::PromptTemplates;
pub use sample_synthesizer::SampleSynthesizer;
pub use repair::{ DefectRepairer, RepairContext };
pub use pipeline::GenerationPipeline;
