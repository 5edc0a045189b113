//! Static question/answer file consulted before generative fallbacks.
//!
//! The file is re-read on every lookup so edits show up without a restart:
//!
//! ```json
//! {"qa_pairs": [{"question": "...", "answer": "...", "keywords": ["..."]}]}
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

const MIN_QUERY_WORD_LEN: usize = 4;
const QUERY_STOP_WORDS: &[&str] = &[
    "what", "when", "where", "how", "why", "who", "which", "is", "are", "the", "and", "that",
];

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("could not read knowledge base {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed knowledge base: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("knowledge base has no qa_pairs")]
    MissingQaPairs,
}

#[derive(Debug, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct KnowledgeBaseFile {
    qa_pairs: Option<Vec<QaPair>>,
}

pub fn parse(raw: &str) -> Result<Vec<QaPair>, KnowledgeBaseError> {
    let file: KnowledgeBaseFile = serde_json::from_str(raw)?;
    file.qa_pairs.ok_or(KnowledgeBaseError::MissingQaPairs)
}

fn query_words(query_lower: &str) -> HashSet<&str> {
    query_lower
        .split_whitespace()
        .filter(|word| {
            word.chars().count() >= MIN_QUERY_WORD_LEN && !QUERY_STOP_WORDS.contains(word)
        })
        .collect()
}

/// A question containing the whole query answers immediately. Otherwise the
/// pair whose keywords cover the largest share of the query words wins,
/// provided the share reaches `min_overlap`. Ties keep file order.
pub fn best_answer<'a>(pairs: &'a [QaPair], query: &str, min_overlap: f64) -> Option<&'a str> {
    let query_lower = query.to_lowercase();
    let words = query_words(&query_lower);

    let mut best: Option<(f64, &QaPair)> = None;
    for pair in pairs {
        if pair.question.to_lowercase().contains(&query_lower) {
            return Some(&pair.answer);
        }

        if words.is_empty() {
            continue;
        }

        let keywords: HashSet<String> = pair.keywords.iter().map(|kw| kw.to_lowercase()).collect();
        let common = words.iter().filter(|word| keywords.contains(**word)).count();
        if common == 0 {
            continue;
        }

        let score = common as f64 / words.len() as f64;
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, pair));
        }
    }

    best.filter(|(score, _)| *score >= min_overlap)
        .map(|(_, pair)| pair.answer.as_str())
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    path: PathBuf,
    min_overlap: f64,
}

impl KnowledgeBase {
    pub fn new(path: impl Into<PathBuf>, min_overlap: f64) -> Self {
        Self {
            path: path.into(),
            min_overlap,
        }
    }

    pub async fn load(&self) -> Result<Vec<QaPair>, KnowledgeBaseError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| KnowledgeBaseError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        parse(&raw)
    }

    /// Any failure to read or parse the file counts as "no answer".
    pub async fn lookup(&self, query: &str) -> Option<String> {
        match self.load().await {
            Ok(pairs) => best_answer(&pairs, query, self.min_overlap).map(str::to_string),
            Err(err) => {
                tracing::error!("Error searching knowledge base: {}", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "qa_pairs": [
            {"question": "What is a Caesar cipher?", "answer": "A shift cipher.", "keywords": ["caesar", "shift"]},
            {"question": "What is AES?", "answer": "A block cipher.", "keywords": ["AES", "block", "symmetric"]},
            {"question": "Is AES symmetric?", "answer": "Yes.", "keywords": ["aes", "symmetric"]}
        ]
    }"#;

    #[test]
    fn question_substring_answers_immediately() {
        let pairs = parse(SAMPLE).unwrap();
        assert_eq!(best_answer(&pairs, "caesar cipher", 0.5), Some("A shift cipher."));
    }

    #[test]
    fn keyword_overlap_above_threshold() {
        let pairs = parse(SAMPLE).unwrap();
        // words: {symmetric, block}; pair 2 covers both
        assert_eq!(best_answer(&pairs, "symmetric block", 0.5), Some("A block cipher."));
    }

    #[test]
    fn ties_keep_file_order() {
        let pairs = parse(SAMPLE).unwrap();
        assert_eq!(best_answer(&pairs, "symmetric hashing", 0.5), Some("A block cipher."));
    }

    #[test]
    fn overlap_below_threshold_is_rejected() {
        let pairs = parse(SAMPLE).unwrap();
        // only "shift" of {shift, registers, explained} matches
        assert_eq!(best_answer(&pairs, "shift registers explained", 0.5), None);
    }

    #[test]
    fn short_and_stop_words_do_not_count() {
        let pairs = parse(SAMPLE).unwrap();
        // in no question, and every word is short or a stop word
        assert_eq!(best_answer(&pairs, "why is the key", 0.5), None);
    }

    #[test]
    fn missing_qa_pairs_is_an_error() {
        assert!(matches!(parse(r#"{"entries": []}"#), Err(KnowledgeBaseError::MissingQaPairs)));
        assert!(matches!(parse("not json"), Err(KnowledgeBaseError::Malformed(_))));
    }

    #[tokio::test]
    async fn lookup_reads_file_on_each_call() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let kb = KnowledgeBase::new(file.path(), 0.5);

        assert_eq!(kb.lookup("what is aes?").await.as_deref(), Some("A block cipher."));

        std::fs::write(file.path(), r#"{"qa_pairs": []}"#).unwrap();
        assert_eq!(kb.lookup("what is aes?").await, None);
    }

    #[tokio::test]
    async fn missing_file_is_no_answer() {
        let kb = KnowledgeBase::new("/nonexistent/knowledge_base.json", 0.5);
        assert_eq!(kb.lookup("anything at all").await, None);
    }
}
