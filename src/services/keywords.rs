use lazy_static::lazy_static;
use regex::Regex;

pub const MAX_KEYWORDS: usize = 10;
const MIN_KEYWORD_LEN: usize = 3;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "can", "i", "you", "he", "she", "it", "we", "they", "this",
    "that", "these", "those",
];

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s]").expect("valid punctuation regex");
}

/// Up to ten lower-cased, punctuation-free tokens longer than two chars,
/// minus stop words, in input order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let cleaned = PUNCTUATION.replace_all(&lower, " ");

    cleaned
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word) && word.chars().count() >= MIN_KEYWORD_LEN)
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_stop_words() {
        assert_eq!(
            extract_keywords("What is the Vigenère cipher, and how does it work?"),
            vec!["what", "vigenère", "cipher", "how", "work"]
        );
    }

    #[test]
    fn drops_short_tokens() {
        assert_eq!(extract_keywords("go to db or ui"), Vec::<String>::new());
    }

    #[test]
    fn keeps_at_most_ten() {
        let text = (0..15).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let keywords = extract_keywords(&text);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords.first().map(String::as_str), Some("word0"));
        assert_eq!(keywords.last().map(String::as_str), Some("word9"));
    }

    #[test]
    fn re_extraction_yields_a_subset() {
        let inputs = [
            "Hello there! Can you explain RSA-2048 key sizes?",
            "C++ templates vs. Rust generics: which one's faster??",
            "don't, won't, can't",
        ];
        for input in inputs {
            let first = extract_keywords(input);
            let second = extract_keywords(&first.join(" "));
            assert!(second.iter().all(|word| first.contains(word)), "{input}");
        }
    }

    #[test]
    fn punctuation_splits_words() {
        assert_eq!(extract_keywords("key-exchange"), vec!["key", "exchange"]);
    }
}
