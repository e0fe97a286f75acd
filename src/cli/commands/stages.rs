use anyhow::Result;

use vizagent::implementations::config::AgentConfig;
use vizagent::models::stage::{ stages_for, StageKind };

use crate::cli::commands::parse_variant;
use crate::cli::ui;

pub fn execute(config: &AgentConfig, variant: Option<&str>) -> Result<()> {
    let variant = parse_variant(variant, config.pipeline.variant)?;
    ui::print_header(&format!("{} pipeline", variant));
    ui::print_stage_list(&stages_for(variant));

    let repair: Vec<&str> = [StageKind::RiskScan, StageKind::ConfirmIssues, StageKind::Patch]
        .iter()
        .map(|k| k.label())
        .collect();
    ui::print_info(&format!("Followed by the repair pass: {}", repair.join(" -> ")));
    Ok(())
}
