use anyhow::{ anyhow, Result };
use std::fs;
use std::path::Path;

use vizagent::implementations::section_extractor::extract_specs;

use crate::cli::ui;

/// Section extraction on a saved specify-stage response
pub fn execute(response_path: &Path) -> Result<()> {
    let text = fs
        ::read_to_string(response_path)
        .map_err(|e| anyhow!("Failed to read response {}: {}", response_path.display(), e))?;
    let specs = extract_specs(&text)?;
    ui::display_specs(&specs);
    Ok(())
}
