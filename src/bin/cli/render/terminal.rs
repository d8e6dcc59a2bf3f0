use classroom_lib::capsules::{Capsule, Level};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
}

/// Wrap `text` in a color code when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Level label, colored like the library badges (green/yellow/red)
pub fn level_badge(level: Level, use_color: bool) -> String {
    let color = match level {
        Level::Beginner => Color::GREEN,
        Level::Intermediate => Color::YELLOW,
        Level::Advanced => Color::RED,
    };
    paint(&format!("[{}]", level), color, use_color)
}

/// Text progress bar for a 0-100 score
pub fn score_bar(score: u32, width: usize) -> String {
    let filled = (score.min(100) as usize * width + 50) / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

/// Render a capsule's full content to terminal text
pub fn render_capsule(capsule: &Capsule, known: &dyn Fn(usize) -> bool, use_color: bool) -> String {
    let mut lines = Vec::new();

    lines.push(paint(&capsule.meta.title, Color::BOLD, use_color));
    let mut meta = level_badge(capsule.meta.level, use_color);
    if !capsule.meta.subject.is_empty() {
        meta.push(' ');
        meta.push_str(&capsule.meta.subject);
    }
    lines.push(meta);
    if !capsule.meta.description.is_empty() {
        lines.push(paint(&capsule.meta.description, Color::DIM, use_color));
    }

    if !capsule.notes.is_empty() {
        lines.push(String::new());
        lines.push(paint("Notes", Color::BOLD, use_color));
        for note in &capsule.notes {
            lines.push(format!("  - {}", note));
        }
    }

    if !capsule.flashcards.is_empty() {
        lines.push(String::new());
        lines.push(paint("Flashcards", Color::BOLD, use_color));
        for (i, card) in capsule.flashcards.iter().enumerate() {
            let mark = if known(i) { paint("*", Color::GREEN, use_color) } else { " ".to_string() };
            lines.push(format!(" {}{:>3}. {}", mark, i, card.front));
            lines.push(format!("        {}", paint(&card.back, Color::DIM, use_color)));
        }
    }

    if !capsule.quiz.is_empty() {
        lines.push(String::new());
        lines.push(paint("Quiz", Color::BOLD, use_color));
        for (i, q) in capsule.quiz.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, q.question));
            for (c, choice) in q.choices.iter().enumerate() {
                let letter = (b'A' + c as u8) as char;
                if q.is_correct(c) {
                    lines.push(paint(&format!("     {}) {}", letter, choice), Color::GREEN, use_color));
                } else {
                    lines.push(format!("     {}) {}", letter, choice));
                }
            }
            if !q.explanation.is_empty() {
                lines.push(paint(&format!("     {}", q.explanation), Color::DIM, use_color));
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(0, 10), "----------");
        assert_eq!(score_bar(50, 10), "#####-----");
        assert_eq!(score_bar(100, 10), "##########");
    }

    #[test]
    fn test_paint_without_color() {
        assert_eq!(paint("x", Color::BOLD, false), "x");
        assert_eq!(level_badge(Level::Advanced, false), "[Advanced]");
    }
}
