use anyhow::Result;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let capsule = app.find_capsule(query)?;
    let progress = app.classroom.get_progress(&capsule.id);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        OutputFormat::Plain => {
            println!("{}", capsule.meta.title);
            println!(
                "  best quiz score: {}% [{}]",
                progress.best_score,
                terminal::score_bar(progress.best_score, 20)
            );
            println!(
                "  known flashcards: {}/{}",
                progress.known_count(capsule.flashcards.len()),
                capsule.flashcards.len()
            );
        }
    }

    Ok(())
}
