use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use classroom_lib::transfer;

use crate::app::App;

/// Write the export to `out`, to `<slug>.json` with `--out .`, or to stdout
pub fn run(app: &App, query: &str, out: Option<PathBuf>) -> Result<()> {
    let capsule = app.find_capsule(query)?;
    let text = app
        .classroom
        .export_capsule(&capsule)
        .context("Failed to serialize capsule")?;

    match out {
        None => println!("{}", text),
        Some(path) => {
            let path = if path.is_dir() {
                path.join(transfer::export_file_name(&capsule))
            } else {
                path
            };
            fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Exported '{}' to {}", capsule.meta.title, path.display());
        }
    }

    Ok(())
}
