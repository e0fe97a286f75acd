use std::fmt;
use std::time::Duration;

use crate::config::PipelineVariant;

/// The stages of a generation run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Produce the structure, style and behavior specs from the task
    Specify,
    /// Summarize the specs into a design document
    Design,
    /// Render the structure spec into bare markup
    Structure,
    /// Obtain a live-verified request/response example from the prediction API
    VerifyExample,
    /// Inject the script block
    Behavior,
    /// Apply utility classes
    Style,
    /// Write the final artifact
    Persist,
    /// Defect repair: list candidate risks
    RiskScan,
    /// Defect repair: confirm and localize the risks
    ConfirmIssues,
    /// Defect repair: rewrite the artifact
    Patch,
}

impl StageKind {
    /// Whether the stage is a single oracle call
    pub fn calls_oracle(&self) -> bool {
        !matches!(self, StageKind::VerifyExample | StageKind::Persist)
    }

    /// Whether the stage embeds the verified example in its prompt
    pub fn requires_example(&self) -> bool {
        matches!(self, StageKind::Behavior)
    }

    /// Whether a failure here aborts the run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, StageKind::VerifyExample)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StageKind::Specify => "specify",
            StageKind::Design => "design",
            StageKind::Structure => "structure",
            StageKind::VerifyExample => "verify-example",
            StageKind::Behavior => "behavior",
            StageKind::Style => "style",
            StageKind::Persist => "persist",
            StageKind::RiskScan => "risk-scan",
            StageKind::ConfirmIssues => "confirm-issues",
            StageKind::Patch => "patch",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One entry of the ordered stage list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    pub kind: StageKind,
    /// Present only in some pipeline variants
    pub optional: bool,
}

impl StageDescriptor {
    pub const fn required(kind: StageKind) -> Self {
        Self { kind, optional: false }
    }

    pub const fn optional(kind: StageKind) -> Self {
        Self { kind, optional: true }
    }
}

const EXTENDED_STAGES: [StageDescriptor; 7] = [
    StageDescriptor::required(StageKind::Specify),
    StageDescriptor::optional(StageKind::Design),
    StageDescriptor::required(StageKind::Structure),
    StageDescriptor::required(StageKind::VerifyExample),
    StageDescriptor::required(StageKind::Behavior),
    StageDescriptor::required(StageKind::Style),
    StageDescriptor::required(StageKind::Persist),
];

/// The ordered stage list of a variant. The reduced variant drops optional stages.
pub fn stages_for(variant: PipelineVariant) -> Vec<StageDescriptor> {
    EXTENDED_STAGES.iter()
        .filter(|stage| variant == PipelineVariant::Extended || !stage.optional)
        .copied()
        .collect()
}

/// A (system instruction, user instruction) pair sent to the oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// The raw text of one oracle call and the prompt that produced it
#[derive(Debug, Clone)]
pub struct StageResult {
    pub stage: StageKind,
    pub prompt: PromptPair,
    pub text: String,
    pub elapsed: Duration,
}

/// Wall time spent in a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTiming {
    pub stage: StageKind,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_variant_has_seven_stages_in_order() {
        let kinds: Vec<StageKind> = stages_for(PipelineVariant::Extended)
            .iter()
            .map(|s| s.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                StageKind::Specify,
                StageKind::Design,
                StageKind::Structure,
                StageKind::VerifyExample,
                StageKind::Behavior,
                StageKind::Style,
                StageKind::Persist
            ]
        );
    }

    #[test]
    fn reduced_variant_skips_design() {
        let stages = stages_for(PipelineVariant::Reduced);
        assert_eq!(stages.len(), 6);
        assert!(stages.iter().all(|s| s.kind != StageKind::Design));
    }

    #[test]
    fn only_example_verification_degrades() {
        let degradable: Vec<StageKind> = stages_for(PipelineVariant::Extended)
            .iter()
            .map(|s| s.kind)
            .filter(|k| !k.is_fatal())
            .collect();
        assert_eq!(degradable, vec![StageKind::VerifyExample]);
    }
}
