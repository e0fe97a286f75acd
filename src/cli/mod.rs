use clap::{ Parser, Subcommand };
use std::net::SocketAddr;
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "vizagent",
    about = "Generates an interactive web front end for an ML task description",
    version,
    author,
    long_about = None
)]
pub struct VizAgentCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "VIZAGENT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline on a task file, then repair the result
    Generate {
        /// Path to the task YAML file
        #[arg(short, long)]
        task: PathBuf,

        /// Pipeline variant (extended, reduced)
        #[arg(short, long)]
        variant: Option<String>,

        /// Verify the example after the structure stage instead of alongside it
        #[arg(long, default_value = "false")]
        sequential: bool,

        /// Write both artifacts into this directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip the defect-repair pass
        #[arg(long, default_value = "false")]
        no_repair: bool,

        /// Ask before overwriting existing artifacts
        #[arg(short, long, default_value = "false")]
        interactive: bool,
    },

    /// Run only the defect-repair pass on an existing HTML file
    Repair {
        /// Path to the HTML artifact
        #[arg(short, long)]
        artifact: PathBuf,

        /// Path to the task YAML file the artifact was generated from
        #[arg(short, long)]
        task: PathBuf,

        /// Where to write the repaired artifact
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Synthesize a sample input for a task and check it against the live API
    Sample {
        /// Path to the task YAML file
        #[arg(short, long)]
        task: PathBuf,

        /// Only ask the model for a plausible input; do not call the API
        #[arg(long, default_value = "false")]
        unverified: bool,
    },

    /// Split a saved specify-stage response into its three sections
    Extract {
        /// Path to the saved response text
        #[arg(short, long)]
        response: PathBuf,
    },

    /// Accept task files over HTTP and run the pipeline on each upload
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "0.0.0.0:8000")]
        addr: SocketAddr,

        /// Directory where uploads are stored
        #[arg(short, long)]
        uploads_dir: Option<PathBuf>,
    },

    /// List the stages of a pipeline variant
    Stages {
        /// Pipeline variant (extended, reduced)
        #[arg(short, long)]
        variant: Option<String>,
    },
}
