//! Presentation helpers shared by front ends

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// Human-friendly age of a timestamp relative to `now`
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds();

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h ago", seconds / 3600)
    } else if seconds < 604800 {
        format!("{}d ago", seconds / 86400)
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

fn slug_patterns() -> &'static (Regex, Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        (
            Regex::new(r"[^\w\s-]").expect("valid regex"),
            Regex::new(r"\s+").expect("valid regex"),
            Regex::new(r"-+").expect("valid regex"),
        )
    })
}

/// Lowercase, hyphen-separated form of a title, for file names
pub fn slugify(text: &str) -> String {
    let (invalid, spaces, hyphens) = slug_patterns();
    let lower = text.trim().to_lowercase();
    let cleaned = invalid.replace_all(&lower, "");
    let hyphenated = spaces.replace_all(&cleaned, "-");
    let collapsed = hyphens.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Banner shown after a finished quiz
pub fn score_message(score: u32) -> &'static str {
    match score {
        100.. => "Perfect Score!",
        80..=99 => "Excellent Work!",
        60..=79 => "Good Job!",
        40..=59 => "Keep Practicing!",
        _ => "Try Again!",
    }
}
