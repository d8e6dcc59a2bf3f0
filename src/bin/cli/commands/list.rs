use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let library = app.classroom.library();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&library)?);
        }
        OutputFormat::Plain => {
            if library.is_empty() {
                println!("(no capsules)");
                return Ok(());
            }
            for card in &library {
                let entry = &card.entry;
                println!(
                    "{} {}",
                    terminal::paint(&entry.title, Color::BOLD, use_color),
                    terminal::level_badge(entry.level, use_color)
                );
                let subject = if entry.subject.is_empty() { String::new() } else { format!("{} · ", entry.subject) };
                println!(
                    "    {}{} · {}",
                    subject,
                    app.classroom.time_ago(entry.updated_at),
                    terminal::paint(&entry.id, Color::DIM, use_color)
                );
                let cards = match card.flashcard_count {
                    Some(total) => format!("{}/{} known", card.known_count, total),
                    None => "record unreadable".to_string(),
                };
                println!(
                    "    best quiz {:>3}% [{}]  flashcards {}",
                    card.best_score,
                    terminal::score_bar(card.best_score, 10),
                    cards
                );
            }
        }
    }

    Ok(())
}
