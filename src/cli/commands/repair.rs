use anyhow::{ anyhow, Result };
use std::fs;
use std::path::Path;
use std::sync::Arc;

use vizagent::implementations::config::AgentConfig;
use vizagent::implementations::oracle_client::build_oracle;
use vizagent::implementations::pipeline::write_artifact;
use vizagent::implementations::prompts::PromptTemplates;
use vizagent::implementations::repair::{ DefectRepairer, RepairContext };
use vizagent::models::artifact::{ Artifact, VerifiedExample };
use vizagent::models::task::TaskDescription;

use crate::cli::ui;

/// Defect repair on an existing artifact. No example is available here, so the
/// confirm step sees the placeholder pair.
pub async fn execute(
    config: &AgentConfig,
    artifact_path: &Path,
    task_path: &Path,
    output_path: Option<&Path>
) -> Result<()> {
    ui::print_header("Repairing Interface");

    let html = fs
        ::read_to_string(artifact_path)
        .map_err(|e| anyhow!("Failed to read artifact {}: {}", artifact_path.display(), e))?;
    let artifact = Artifact::from_oracle_text(&html);
    if artifact.is_empty() {
        return Err(anyhow!("Artifact {} is empty", artifact_path.display()));
    }
    let task = TaskDescription::from_path(task_path)?;

    let oracle = build_oracle(&config.oracle)?;
    let prompts = Arc::new(PromptTemplates::with_overrides(&config.prompt_templates)?);
    let repairer = DefectRepairer::new(oracle, prompts);
    let context = RepairContext::from_task(&task, VerifiedExample::sentinel());

    let spinner = ui::spinner_with_message("Scanning for defects...");
    let outcome = match repairer.repair(&artifact, &context).await {
        Ok(outcome) => {
            spinner.finish_with_message("Repair finished");
            outcome
        }
        Err(e) => {
            spinner.finish_with_message("Repair failed");
            return Err(e.into());
        }
    };

    let output = output_path.unwrap_or(config.pipeline.repaired_path.as_path());
    let path = write_artifact(output, &outcome.artifact)?;

    ui::print_header("Risks");
    ui::print_text(&outcome.risks);
    if let Some(confirmed) = &outcome.confirmed_issues {
        ui::print_header("Confirmed Issues");
        ui::print_text(confirmed);
    }
    ui::print_repair_outcome(&outcome);
    ui::print_result("Repaired", &path.display().to_string());
    Ok(())
}
