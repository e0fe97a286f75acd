use std::path::PathBuf;
use std::time::Duration;

use chrono::{ DateTime, Utc };

use crate::config::PipelineVariant;
use crate::models::artifact::{ Artifact, DesignDocument, VerifiedExample };
use crate::models::spec_triple::SpecTriple;
use crate::models::stage::StageTiming;

/// What the defect-repair sub-pipeline produced
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub artifact: Artifact,
    /// Risk scan output
    pub risks: String,
    /// Confirm & localize output; `None` when the scan found nothing
    pub confirmed_issues: Option<String>,
    pub changed: bool,
}

/// Repair result as recorded in a run
#[derive(Debug, Clone)]
pub struct RepairReport {
    pub outcome: RepairOutcome,
    pub path: PathBuf,
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub run_id: String,
    pub variant: PipelineVariant,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub timings: Vec<StageTiming>,
    pub specs: SpecTriple,
    pub design: Option<DesignDocument>,
    pub example: VerifiedExample,
    pub artifact: Artifact,
    pub generated_path: PathBuf,
    /// `None` when repair is disabled in the options
    pub repair: Option<RepairReport>,
}

impl PipelineOutcome {
    pub fn total_stage_time(&self) -> Duration {
        self.timings.iter().map(|t| t.elapsed).sum()
    }

    /// The example could not be verified and the sentinel was embedded
    pub fn is_degraded(&self) -> bool {
        self.example.is_sentinel()
    }
}
