use anyhow::{bail, Context, Result};

use classroom_lib::display;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, query: &str, correct: usize, total: usize, format: &OutputFormat) -> Result<()> {
    if correct > total {
        bail!("Correct answers ({}) exceed total questions ({})", correct, total);
    }
    let capsule = app.find_capsule(query)?;

    let outcome = app
        .classroom
        .record_quiz(&capsule.id, correct, total)
        .context("Failed to save progress")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Plain => {
            println!("{}% - {}", outcome.score, display::score_message(outcome.score));
            println!("You got {} out of {} questions correct", correct, total);
            if outcome.new_best {
                println!("New best score!");
            } else {
                println!("Your best score: {}%", outcome.best_score);
            }
        }
    }
    Ok(())
}
