use anyhow::{Context, Result};

use crate::app::App;

pub fn run(app: &App) -> Result<()> {
    match app
        .classroom
        .seed_sample_if_empty()
        .context("Failed to save sample capsule")?
    {
        Some(capsule) => println!("Added sample capsule '{}' ({})", capsule.meta.title, capsule.id),
        None => println!("Library is not empty, nothing to do"),
    }
    Ok(())
}
