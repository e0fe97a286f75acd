use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use vizagent::implementations::config::AgentConfig;
use vizagent::server::{ self, AppState };

use crate::cli::commands::build_pipeline;
use crate::cli::ui;

pub async fn execute(config: &AgentConfig, addr: SocketAddr, uploads_dir: Option<&Path>) -> Result<()> {
    let pipeline = Arc::new(build_pipeline(config, config.pipeline.to_options())?);
    let uploads_dir = uploads_dir.unwrap_or(config.pipeline.uploads_dir.as_path()).to_path_buf();

    ui::print_header("Upload Server");
    ui::print_result("Listening", &format!("http://{}/upload", addr));
    ui::print_result("Uploads", &uploads_dir.display().to_string());

    let state = Arc::new(AppState::new(pipeline, uploads_dir));
    server::serve(addr, state).await?;
    Ok(())
}
