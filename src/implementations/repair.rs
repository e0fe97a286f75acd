use std::sync::Arc;

use log::info;

use crate::errors::{ VizError, VizResult };
use crate::implementations::oracle_client::invoke_stage;
use crate::implementations::prompts::PromptTemplates;
use crate::models::artifact::{ Artifact, VerifiedExample };
use crate::models::outcome::RepairOutcome;
use crate::models::stage::StageKind;
use crate::models::task::TaskDescription;
use crate::traits::oracle::Oracle;

/// Task context the confirm and patch steps need
#[derive(Debug, Clone)]
pub struct RepairContext {
    pub description: String,
    pub model_information: String,
    pub example: VerifiedExample,
}

impl RepairContext {
    pub fn from_task(task: &TaskDescription, example: VerifiedExample) -> Self {
        Self {
            description: task.description().to_string(),
            model_information: task.model_information_text(),
            example,
        }
    }
}

/// Risk scan, confirm & localize, patch
#[derive(Clone)]
pub struct DefectRepairer {
    oracle: Arc<dyn Oracle>,
    prompts: Arc<PromptTemplates>,
}

impl DefectRepairer {
    pub fn new(oracle: Arc<dyn Oracle>, prompts: Arc<PromptTemplates>) -> Self {
        Self { oracle, prompts }
    }

    /// List candidate functional-logic risks in the embedded script
    pub async fn detect_risks(&self, artifact: &Artifact) -> VizResult<String> {
        let prompt = self.prompts.risk_scan(artifact)?;
        Ok(invoke_stage(self.oracle.as_ref(), StageKind::RiskScan, prompt).await?.text)
    }

    /// Confirm or dismiss each risk and point at the code involved
    pub async fn confirm_issues(
        &self,
        artifact: &Artifact,
        risks: &str,
        context: &RepairContext
    ) -> VizResult<String> {
        let prompt = self.prompts.confirm(
            artifact,
            risks,
            &context.description,
            &context.model_information,
            &context.example
        )?;
        Ok(invoke_stage(self.oracle.as_ref(), StageKind::ConfirmIssues, prompt).await?.text)
    }

    /// Ask for the whole corrected document. An empty document is `MalformedOutput`.
    pub async fn patch(
        &self,
        artifact: &Artifact,
        confirmed_issues: &str,
        context: &RepairContext
    ) -> VizResult<Artifact> {
        let prompt = self.prompts.patch(artifact, confirmed_issues, &context.description)?;
        let text = invoke_stage(self.oracle.as_ref(), StageKind::Patch, prompt).await?.text;
        let patched = Artifact::from_oracle_text(&text);
        if patched.is_empty() {
            return Err(
                VizError::malformed(
                    format!("{} stage", StageKind::Patch),
                    "oracle returned an empty document",
                    text
                )
            );
        }
        Ok(patched)
    }

    /// Run the three steps. When the scan reports nothing, the artifact is
    /// returned untouched and no further oracle calls are made.
    pub async fn repair(
        &self,
        artifact: &Artifact,
        context: &RepairContext
    ) -> VizResult<RepairOutcome> {
        info!("Scanning generated interface for defects");
        let risks = self.detect_risks(artifact).await?;

        if reports_no_risks(&risks) {
            info!("Risk scan found no issues, keeping the artifact unchanged");
            return Ok(RepairOutcome {
                artifact: artifact.clone(),
                risks,
                confirmed_issues: None,
                changed: false,
            });
        }

        info!("Confirming candidate issues");
        let confirmed = self.confirm_issues(artifact, &risks, context).await?;

        info!("Patching confirmed issues");
        let patched = self.patch(artifact, &confirmed, context).await?;
        let changed = patched != *artifact;

        Ok(RepairOutcome {
            artifact: patched,
            risks,
            confirmed_issues: Some(confirmed),
            changed,
        })
    }
}

/// True for an empty scan or an explicit "nothing found" answer
pub fn reports_no_risks(risks: &str) -> bool {
    let normalized = risks
        .trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .to_lowercase();
    matches!(
        normalized.as_str(),
        "" | "none" | "no issues" | "no risks" | "no issues found" | "no risks found" | "n/a"
    )
}
