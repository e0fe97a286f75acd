use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use vizagent::implementations::config::AgentConfig;
use vizagent::implementations::oracle_client::build_oracle;
use vizagent::implementations::prediction_client::HttpPredictionApi;
use vizagent::implementations::prompts::PromptTemplates;
use vizagent::implementations::sample_synthesizer::{ to_single_line_json, SampleSynthesizer };
use vizagent::models::task::TaskDescription;

use crate::cli::ui;

/// Sample synthesis on its own, verified against the live API unless `unverified`
pub async fn execute(config: &AgentConfig, task_path: &Path, unverified: bool) -> Result<()> {
    ui::print_header("Sample Input");

    let task = TaskDescription::from_path(task_path)?;
    let synthesizer = SampleSynthesizer::new(
        build_oracle(&config.oracle)?,
        Arc::new(HttpPredictionApi::new(&config.prediction_api)?),
        Arc::new(PromptTemplates::with_overrides(&config.prompt_templates)?)
    );

    if unverified {
        let spinner = ui::spinner_with_message("Generating sample input...");
        let value = synthesizer.generate_fake_data(&task).await;
        spinner.finish_and_clear();
        ui::print_result("Input", &to_single_line_json(&value?)?);
        return Ok(());
    }

    if let Some(url) = task.api_url() {
        ui::print_result("API", url);
    }
    let spinner = ui::spinner_with_message("Generating and verifying sample input...");
    let example = synthesizer.get_model_output(&task).await;
    spinner.finish_and_clear();
    ui::display_example(&example?);
    Ok(())
}
