use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::config::{Settings, repository};
use crate::import::{EntityKind, Importer};

/// Import a local spreadsheet and print the outcome
pub async fn handle_import_command(
    settings: &Settings,
    kind: EntityKind,
    file: &Path,
    json: bool,
) -> Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let pool = repository::connect(&settings.database_url).await?;
    let outcome = Importer::new(&pool).import(kind, &file_name, bytes).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "{} Imported {} {} row(s) from {}",
        "✓".bright_green(),
        outcome.imported().to_string().bold(),
        kind,
        file.display().to_string().cyan()
    );
    for warning in outcome.warnings() {
        println!("  {} {}", "!".bright_yellow(), warning);
    }
    if !outcome.errors().is_empty() {
        println!(
            "{} {} row(s) skipped:",
            "✗".bright_red(),
            outcome.errors().len()
        );
        for error in outcome.errors() {
            println!("  {}", error.dimmed());
        }
    }

    Ok(())
}
