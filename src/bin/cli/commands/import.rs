use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, file: &Path, format: &OutputFormat) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let capsule = app
        .classroom
        .import_capsule_json(&text)
        .context("Import failed")?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "id": capsule.id,
                    "title": capsule.meta.title,
                }))?
            );
        }
        OutputFormat::Plain => {
            println!("Imported '{}' as {}", capsule.meta.title, capsule.id);
        }
    }

    Ok(())
}
