//! Demo capsule offered to new users with an empty library

use super::models::{Capsule, CapsuleMeta, Flashcard, Level, QuizQuestion};

fn choices(a: &str, b: &str, c: &str, d: &str) -> [String; 4] {
    [a.to_string(), b.to_string(), c.to_string(), d.to_string()]
}

/// Build the "JavaScript Fundamentals" demo capsule under a fresh id
pub fn sample_capsule() -> Capsule {
    let mut capsule = Capsule::new("JavaScript Fundamentals");
    capsule.meta = CapsuleMeta {
        title: "JavaScript Fundamentals".to_string(),
        subject: "Programming".to_string(),
        level: Level::Beginner,
        description: "Essential JavaScript concepts for beginners".to_string(),
    };
    capsule.notes = [
        "JavaScript is a high-level, interpreted programming language",
        "Variables can be declared using let, const, or var",
        "Functions are first-class citizens in JavaScript",
        "Arrays and objects are the main data structures",
        "JavaScript supports both functional and object-oriented programming",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    capsule.flashcards = vec![
        Flashcard::new(
            "What are the three ways to declare variables in JavaScript?",
            "let, const, and var",
        ),
        Flashcard::new(
            "What is the difference between == and ===?",
            "== checks for value equality with type coercion, === checks for strict equality without type coercion",
        ),
        Flashcard::new(
            "What is a closure in JavaScript?",
            "A closure is a function that has access to variables in its outer (enclosing) lexical scope, even after the outer function has returned",
        ),
    ];
    capsule.quiz = vec![
        QuizQuestion {
            question: "Which keyword is used to declare a constant in JavaScript?".to_string(),
            choices: choices("var", "let", "const", "static"),
            correct_index: 2,
            explanation: "The 'const' keyword is used to declare constants that cannot be reassigned.".to_string(),
        },
        QuizQuestion {
            question: "What will typeof null return?".to_string(),
            choices: choices("null", "undefined", "object", "number"),
            correct_index: 2,
            explanation: "This is a known quirk in JavaScript - typeof null returns 'object' due to a legacy bug.".to_string(),
        },
        QuizQuestion {
            question: "Which method is used to add an element to the end of an array?".to_string(),
            choices: choices("push()", "pop()", "shift()", "unshift()"),
            correct_index: 0,
            explanation: "The push() method adds one or more elements to the end of an array.".to_string(),
        },
    ];
    capsule
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_capsule_is_valid() {
        let capsule = sample_capsule();
        assert!(capsule.check().is_ok());
        assert_eq!(capsule.notes.len(), 5);
        assert_eq!(capsule.flashcards.len(), 3);
        assert_eq!(capsule.quiz.len(), 3);
        assert_ne!(sample_capsule().id, capsule.id);
    }
}
