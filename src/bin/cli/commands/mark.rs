use anyhow::{bail, Context, Result};

use crate::app::App;

pub fn run(app: &App, query: &str, index: usize, unknown: bool) -> Result<()> {
    let capsule = app.find_capsule(query)?;
    if index >= capsule.flashcards.len() {
        bail!(
            "Flashcard {} does not exist ('{}' has {} flashcards)",
            index,
            capsule.meta.title,
            capsule.flashcards.len()
        );
    }

    let progress = app
        .classroom
        .set_flashcard_known(&capsule.id, index, !unknown)
        .context("Failed to save progress")?;

    println!(
        "Flashcard {} marked {} ({}/{} known)",
        index,
        if unknown { "unknown" } else { "known" },
        progress.known_count(capsule.flashcards.len()),
        capsule.flashcards.len()
    );
    Ok(())
}
