use anyhow::{Context, Result};

use crate::app::App;

pub fn run(app: &App, query: &str) -> Result<()> {
    let capsule = app.find_capsule(query)?;
    app.classroom
        .delete_capsule(&capsule.id)
        .context("Failed to delete capsule")?;
    println!("Deleted '{}'", capsule.meta.title);
    Ok(())
}
