use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, repair: bool, format: &OutputFormat) -> Result<()> {
    let report = app
        .classroom
        .verify_index()
        .context("Failed to read capsule records")?;

    if let OutputFormat::Json = format {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "consistent": report.is_consistent(),
                "orphanEntries": report.orphan_entries,
                "unindexedRecords": report.unindexed_records,
                "staleEntries": report.stale_entries,
                "duplicateEntries": report.duplicate_entries,
            }))?
        );
    } else if report.is_consistent() {
        println!("Index is consistent");
    } else {
        for id in &report.orphan_entries {
            println!("orphan index entry: {}", id);
        }
        for id in &report.unindexed_records {
            println!("record missing from index: {}", id);
        }
        for id in &report.stale_entries {
            println!("stale index entry: {}", id);
        }
        for id in &report.duplicate_entries {
            println!("duplicate index entry: {}", id);
        }
    }

    if repair && !report.is_consistent() {
        let count = app
            .classroom
            .rebuild_index()
            .context("Failed to rebuild index")?;
        eprintln!("Rebuilt index with {} entries", count);
    }

    Ok(())
}
