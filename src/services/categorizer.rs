//! Coarse classification of user input, used to pick a response style.

use serde::{Deserialize, Serialize};

const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "greetings"];
const QUESTION_WORDS: &[&str] = &["how", "what", "why", "where", "when", "explain"];
const TECHNICAL_WORDS: &[&str] = &["technical", "code", "programming", "algorithm", "function"];
const CREATIVE_WORDS: &[&str] = &["create", "design", "imagine", "creative", "story"];

/// Inputs shorter than this many tokens, with no category word, ask for clarification.
const CLARIFICATION_MAX_TOKENS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Greeting,
    Helpful,
    Technical,
    Creative,
    Clarification,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Greeting => "greeting",
            Category::Helpful => "helpful",
            Category::Technical => "technical",
            Category::Creative => "creative",
            Category::Clarification => "clarification",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

/// Matching is by substring, in the order greeting, question words,
/// technical terms, creative terms. Always yields a label.
pub fn categorize(input: &str) -> Category {
    let lower = input.to_lowercase();

    if contains_any(&lower, GREETING_WORDS) {
        Category::Greeting
    } else if contains_any(&lower, QUESTION_WORDS) {
        Category::Helpful
    } else if contains_any(&lower, TECHNICAL_WORDS) {
        Category::Technical
    } else if contains_any(&lower, CREATIVE_WORDS) {
        Category::Creative
    } else if lower.split_whitespace().count() < CLARIFICATION_MAX_TOKENS {
        Category::Clarification
    } else {
        Category::Helpful
    }
}
