use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use classroom_lib::capsules::{Capsule, IndexEntry};
use classroom_lib::{Classroom, ClassroomConfig};

/// Shared application state for CLI commands
pub struct App {
    pub classroom: Classroom,
}

impl App {
    /// Open the classroom from config, honoring a `--data-dir` override
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>, seed: bool) -> Result<Self> {
        let mut config = ClassroomConfig::load(config_path)
            .context("Failed to load configuration")?;
        if data_dir.is_some() {
            config.data_dir = data_dir;
        }
        config.seed_sample = config.seed_sample && seed;

        let classroom = Classroom::open(&config)
            .context("Failed to open classroom storage")?;

        Ok(Self { classroom })
    }

    /// Find a capsule by id, or by title (case-insensitive prefix match)
    pub fn find_capsule(&self, query: &str) -> Result<Capsule> {
        let index = self.classroom.get_capsules_index();

        let entry = if let Some(entry) = index.iter().find(|e| e.id == query) {
            entry.clone()
        } else {
            let query_lower = query.to_lowercase();

            // Exact title match first
            if let Some(entry) = index.iter().find(|e| e.title.to_lowercase() == query_lower) {
                entry.clone()
            } else {
                let matches: Vec<&IndexEntry> = index.iter()
                    .filter(|e| e.title.to_lowercase().starts_with(&query_lower))
                    .collect();

                match matches.len() {
                    0 => bail!("No capsule matching '{}'. Available capsules:\n{}", query,
                        index.iter().map(|e| format!("  - {} ({})", e.title, e.id)).collect::<Vec<_>>().join("\n")),
                    1 => matches[0].clone(),
                    _ => bail!("Ambiguous capsule '{}'. Matches:\n{}", query,
                        matches.iter().map(|e| format!("  - {} ({})", e.title, e.id)).collect::<Vec<_>>().join("\n")),
                }
            }
        };

        self.classroom
            .get_capsule(&entry.id)
            .with_context(|| format!("Capsule '{}' is listed but its record is missing or unreadable", entry.title))
    }
}
