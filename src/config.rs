use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use serde::{ Deserialize, Serialize };

/// Default location of the freshly generated interface
pub const DEFAULT_GENERATED_PATH: &str = "tests/integration_tests/generated_ui.html";
/// Default location of the defect-repaired interface
pub const DEFAULT_REPAIRED_PATH: &str = "tests/integration_tests/fixed_generated_ui.html";
/// Default directory for files received by the upload endpoint
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";

/// Which stage list the orchestrator runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PipelineVariant {
    /// Seven stages, including Design, with stricter layout-stability instructions
    #[default]
    Extended,
    /// Five oracle-facing stages, no Design stage
    Reduced,
}

impl fmt::Display for PipelineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineVariant::Extended => write!(f, "extended"),
            PipelineVariant::Reduced => write!(f, "reduced"),
        }
    }
}

impl FromStr for PipelineVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "extended" | "full" | "seven" => Ok(PipelineVariant::Extended),
            "reduced" | "basic" | "five" => Ok(PipelineVariant::Reduced),
            other => Err(format!("Unknown pipeline variant: {}", other)),
        }
    }
}

/// Where a run writes its two artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub generated: PathBuf,
    pub repaired: PathBuf,
}

impl OutputPaths {
    /// Both artifacts under `dir`, keeping the default file names
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            generated: dir.join("generated_ui.html"),
            repaired: dir.join("fixed_generated_ui.html"),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            generated: PathBuf::from(DEFAULT_GENERATED_PATH),
            repaired: PathBuf::from(DEFAULT_REPAIRED_PATH),
        }
    }
}

/// Options for one pipeline instance. Built once, read-only during runs.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub variant: PipelineVariant,
    /// Run the example verification alongside the specify/design/structure chain
    pub concurrent_example: bool,
    pub output: OutputPaths,
    /// Run the defect-repair sub-pipeline after persisting the generated artifact
    pub repair: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            variant: PipelineVariant::Extended,
            concurrent_example: true,
            output: OutputPaths::default(),
            repair: true,
        }
    }
}
