use anyhow::Result;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, query: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let capsule = app.find_capsule(query)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&capsule)?);
        }
        OutputFormat::Plain => {
            let progress = app.classroom.get_progress(&capsule.id);
            let known = |i: usize| progress.is_known(i);
            println!("{}", terminal::render_capsule(&capsule, &known, use_color));
        }
    }

    Ok(())
}
