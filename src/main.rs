use clap::Parser;
use dotenv::dotenv;
use log::{ error, info };
use anyhow::Result;
use vizagent::errors::{ RecoverableError, VizError };
use vizagent::implementations::config::AgentConfig;
mod cli;
use cli::{ commands, ui, Commands, VizAgentCli };
use cli::commands::generate::GenerateArgs;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenv().ok();

    let cli = VizAgentCli::parse();
    setup_logging(&cli.log_level);

    if let Err(e) = run(cli).await {
        error!("Command failed: {:#}", e);
        report_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: VizAgentCli) -> Result<()> {
    let config = AgentConfig::load(cli.config.as_deref()).map_err(VizError::from)?;

    match &cli.command {
        Commands::Generate { task, variant, sequential, output_dir, no_repair, interactive } => {
            let args = GenerateArgs {
                task,
                variant: variant.as_deref(),
                sequential: *sequential,
                output_dir: output_dir.as_deref(),
                no_repair: *no_repair,
                interactive: *interactive,
            };
            commands::generate::execute(&config, args).await
        }
        Commands::Repair { artifact, task, output } => {
            commands::repair::execute(&config, artifact, task, output.as_deref()).await
        }
        Commands::Sample { task, unverified } => {
            commands::sample::execute(&config, task, *unverified).await
        }
        Commands::Extract { response } => commands::extract::execute(response),
        Commands::Serve { addr, uploads_dir } => {
            commands::serve::execute(&config, *addr, uploads_dir.as_deref()).await
        }
        Commands::Stages { variant } => commands::stages::execute(&config, variant.as_deref()),
    }
}

/// Print the error, the offending model output if there is one, and a hint
fn report_error(e: &anyhow::Error) {
    ui::print_error(&format!("{:#}", e));

    if let Some(viz) = e.downcast_ref::<VizError>() {
        if let Some(text) = viz.offending_text() {
            ui::print_header("Model Output");
            ui::print_text(text);
        }
        if let Some(hint) = viz.recovery_strategy() {
            ui::print_info(&hint);
        }
    }
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
