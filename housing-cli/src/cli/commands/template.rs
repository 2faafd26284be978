use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::*;

use crate::excel::write_template;
use crate::import::EntityKind;

pub fn handle_template_command(kind: EntityKind, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(kind.template_filename()));
    let bytes = write_template(kind)?;
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write template: {}", path.display()))?;

    println!(
        "{} Wrote {} template to {}",
        "✓".bright_green(),
        kind,
        path.display().to_string().cyan()
    );
    Ok(())
}
