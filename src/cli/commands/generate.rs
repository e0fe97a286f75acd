use anyhow::Result;
use std::path::{ Path, PathBuf };

use vizagent::config::OutputPaths;
use vizagent::implementations::config::AgentConfig;
use vizagent::models::task::TaskDescription;

use crate::cli::commands::{ build_pipeline, parse_variant };
use crate::cli::ui;

pub struct GenerateArgs<'a> {
    pub task: &'a Path,
    pub variant: Option<&'a str>,
    pub sequential: bool,
    pub output_dir: Option<&'a Path>,
    pub no_repair: bool,
    pub interactive: bool,
}

/// Full generation run
pub async fn execute(config: &AgentConfig, args: GenerateArgs<'_>) -> Result<()> {
    ui::print_header("Generating Interface");

    let mut options = config.pipeline.to_options();
    options.variant = parse_variant(args.variant, options.variant)?;
    options.concurrent_example = options.concurrent_example && !args.sequential;
    options.repair = options.repair && !args.no_repair;
    if let Some(dir) = args.output_dir {
        options.output = OutputPaths::in_dir(dir);
    }

    ui::print_info("Loading task description...");
    let task = TaskDescription::from_path(args.task)?;
    ui::print_result("Task", task.description().lines().next().unwrap_or_default());
    ui::print_result("Variant", &options.variant.to_string());

    if args.interactive {
        let mut existing: Vec<&PathBuf> = vec![&options.output.generated];
        if options.repair {
            existing.push(&options.output.repaired);
        }
        existing.retain(|p| p.exists());
        if !existing.is_empty() {
            let names: Vec<String> = existing.iter().map(|p| p.display().to_string()).collect();
            let prompt = format!("Overwrite {}?", names.join(" and "));
            if !ui::confirm_action(&prompt)? {
                ui::print_warning("Generation cancelled, existing artifacts kept");
                return Ok(());
            }
        }
    }

    let pipeline = build_pipeline(config, options)?;

    let spinner = ui::spinner_with_message("Running pipeline stages...");
    let result = pipeline.run_task(task).await;
    match result {
        Ok(outcome) => {
            spinner.finish_with_message("Pipeline finished");
            ui::print_outcome(&outcome);
            ui::print_success("Interface generated");
            Ok(())
        }
        Err(e) => {
            spinner.finish_with_message("Pipeline failed");
            Err(e.into())
        }
    }
}
