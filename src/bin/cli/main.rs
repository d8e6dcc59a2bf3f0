mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "classroom-cli", about = "Pocket Classroom capsule library", version)]
struct Cli {
    /// Store directory (overrides config and CLASSROOM_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List capsules, most recently updated first
    List,

    /// Show a capsule's notes, flashcards and quiz
    Show {
        /// Capsule id or title (case-insensitive prefix match)
        capsule: String,
    },

    /// Import a capsule from an exported JSON file
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Export a capsule as JSON
    Export {
        /// Capsule id or title
        capsule: String,
        /// Output file, or a directory to write `<title>.json` into (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete a capsule and its progress
    Delete {
        /// Capsule id or title
        capsule: String,
    },

    /// Show study progress for a capsule
    Progress {
        /// Capsule id or title
        capsule: String,
    },

    /// Mark a flashcard as known (or unknown)
    Mark {
        /// Capsule id or title
        capsule: String,
        /// Flashcard position, starting at 0
        index: usize,
        /// Mark as not known instead
        #[arg(long)]
        unknown: bool,
    },

    /// Record a finished quiz
    Score {
        /// Capsule id or title
        capsule: String,
        /// Number of correct answers
        correct: usize,
        /// Number of questions
        total: usize,
    },

    /// Add the sample capsule if the library is empty
    Seed,

    /// Check the capsule index against the stored records
    Verify {
        /// Rebuild the index if it is inconsistent
        #[arg(long)]
        repair: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();

    // Seeding happens on open, except where the command owns that decision
    let seed = !matches!(cli.command, Command::Verify { .. } | Command::Seed);
    let app = app::App::new(cli.config.as_deref(), cli.data_dir.clone(), seed)?;

    match cli.command {
        Command::List => commands::list::run(&app, &cli.format, use_color)?,
        Command::Show { capsule } => commands::show::run(&app, &capsule, &cli.format, use_color)?,
        Command::Import { file } => commands::import::run(&app, &file, &cli.format)?,
        Command::Export { capsule, out } => commands::export::run(&app, &capsule, out)?,
        Command::Delete { capsule } => commands::delete::run(&app, &capsule)?,
        Command::Progress { capsule } => commands::progress::run(&app, &capsule, &cli.format)?,
        Command::Mark { capsule, index, unknown } => {
            commands::mark::run(&app, &capsule, index, unknown)?
        }
        Command::Score { capsule, correct, total } => {
            commands::score::run(&app, &capsule, correct, total, &cli.format)?
        }
        Command::Seed => commands::seed::run(&app)?,
        Command::Verify { repair } => commands::verify::run(&app, repair, &cli.format)?,
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}
