pub mod task;
pub mod stage;
pub mod spec_triple;
pub mod artifact;
pub mod outcome;

// Re-export common model types
pub use task::TaskDescription;
pub use stage::{ PromptPair, StageDescriptor, StageKind, StageResult, StageTiming };
pub use spec_triple::SpecTriple;
pub use artifact::{ Artifact, DesignDocument, VerifiedExample, SENTINEL };
pub use outcome::{ PipelineOutcome, RepairOutcome, RepairReport };
