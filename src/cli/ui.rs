use colored::*;
use console::Term;
use dialoguer::{ theme::ColorfulTheme, Confirm };
use indicatif::{ ProgressBar, ProgressStyle };
use std::time::Duration;
use textwrap::wrap;

use vizagent::models::outcome::{ PipelineOutcome, RepairOutcome };
use vizagent::models::spec_triple::SpecTriple;
use vizagent::models::stage::StageDescriptor;
use vizagent::models::artifact::VerifiedExample;

/// UI theme for consistent appearance
pub fn get_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

fn term_width() -> usize {
    (Term::stdout().size().1 as usize).max(40)
}

/// Print a section header
pub fn print_header(title: &str) {
    let title = format!(" {} ", title);
    println!("\n{}\n", title.bold().white().on_blue());
}

/// Print text with proper wrapping
pub fn print_text(text: &str) {
    let width = term_width();
    for line in text.lines() {
        if line.starts_with('#') {
            println!("{}", line.bold());
        } else if line.starts_with('-') || line.starts_with("```") || line.starts_with('<') {
            println!("{}", line);
        } else {
            for wrapped_line in wrap(line, width.saturating_sub(10)) {
                println!("{}", wrapped_line);
            }
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "WARNING:".yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "SUCCESS:".green().bold(), message);
}

/// Print information
pub fn print_info(message: &str) {
    println!("{} {}", "INFO:".blue().bold(), message);
}

/// Print a formatted result
pub fn print_result(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Show the three sections of a spec triple
pub fn display_specs(specs: &SpecTriple) {
    for (title, body) in [
        ("Structure", &specs.structure),
        ("Style", &specs.style),
        ("Behavior", &specs.behavior),
    ] {
        print_header(title);
        print_text(body);
    }
}

pub fn display_example(example: &VerifiedExample) {
    if example.is_sentinel() {
        print_warning("The prediction API could not be verified; using the placeholder example");
    }
    print_result("Input", &example.input);
    print_result("Output", &example.output);
}

/// Print the stage list with optional stages marked
pub fn print_stage_list(stages: &[StageDescriptor]) {
    for (i, stage) in stages.iter().enumerate() {
        let marker = if stage.optional { " (optional)".dimmed().to_string() } else { String::new() };
        let kind = if stage.kind.calls_oracle() { "oracle" } else { "local" };
        println!("  {}. {} [{}]{}", i + 1, stage.kind.label().cyan(), kind, marker);
    }
}

pub fn print_repair_outcome(outcome: &RepairOutcome) {
    if outcome.confirmed_issues.is_none() {
        print_info("Risk scan reported no issues");
    } else if outcome.changed {
        print_success("Confirmed issues were patched");
    } else {
        print_warning("Issues were confirmed but the patch left the artifact unchanged");
    }
}

/// Summary of a finished run
pub fn print_outcome(outcome: &PipelineOutcome) {
    print_header("Run Summary");
    print_result("Run", &outcome.run_id);
    print_result("Variant", &outcome.variant.to_string());
    for timing in &outcome.timings {
        println!("  {:<16} {:>8.2}s", timing.stage.label(), timing.elapsed.as_secs_f64());
    }
    print_result(
        "Wall time",
        &format!(
            "{:.2}s",
            (outcome.finished_at - outcome.started_at).num_milliseconds() as f64 / 1000.0
        )
    );
    if outcome.is_degraded() {
        print_warning("Generated without a verified example");
    }
    print_result("Generated", &outcome.generated_path.display().to_string());
    match &outcome.repair {
        Some(report) => {
            print_repair_outcome(&report.outcome);
            print_result("Repaired", &report.path.display().to_string());
        }
        None => print_info("Repair skipped"),
    }
}

/// Confirm an action with the user
pub fn confirm_action(prompt: &str) -> std::io::Result<bool> {
    Confirm::with_theme(&get_theme())
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Display a spinner while waiting for an operation to complete
pub fn spinner_with_message(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
