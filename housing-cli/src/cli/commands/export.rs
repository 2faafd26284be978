use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::*;

use crate::config::{Settings, repository};
use crate::export::export_workbook;
use crate::import::EntityKind;

pub async fn handle_export_command(
    settings: &Settings,
    kind: EntityKind,
    output: Option<PathBuf>,
) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(kind.export_filename()));

    let pool = repository::connect(&settings.database_url).await?;
    let bytes = export_workbook(&pool, kind).await?;
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    println!(
        "{} Exported {} records to {}",
        "✓".bright_green(),
        kind,
        path.display().to_string().cyan()
    );
    Ok(())
}
