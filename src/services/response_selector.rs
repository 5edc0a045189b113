//! Picks the bot reply for a user message.
//!
//! A well-rated remembered pattern wins outright. Otherwise a chain of
//! lookups (canned rules, knowledge base, chat model, generic templates)
//! produces a base reply, which may then be prefixed with an opening phrase
//! borrowed from well-rated patterns.

use crate::configuration::{ResponderSettings, Settings};
use crate::connectors::{self, ChatModelConnector};
use crate::db;
use crate::models::{ModelParameters, ResponsePattern};
use crate::services::categorizer::{categorize, Category};
use crate::services::keywords::extract_keywords;
use crate::services::knowledge_base::KnowledgeBase;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

const MAX_PHRASES: usize = 3;
const PHRASE_MIN_LEN: usize = 10;
const PHRASE_MAX_LEN: usize = 100;

const LAST_RESORT: &str = "I'd be happy to help you with that!";

const GREETING_TEMPLATES: &[&str] = &[
    "Hello! I'm CipherDepth, your AI assistant. How can I help you today?",
    "Hi there! I'm here to help you with any questions or tasks you have.",
    "Welcome! I'm CipherDepth, ready to assist you with whatever you need.",
];
const HELPFUL_TEMPLATES: &[&str] = &[
    "I'd be happy to help you with that! Let me provide you with a detailed response.",
    "Great question! Here's what I can tell you about that:",
    "I'll do my best to assist you with this. Here's my response:",
];
const CLARIFICATION_TEMPLATES: &[&str] = &[
    "I want to make sure I understand correctly. Could you provide a bit more detail?",
    "To give you the best answer, could you clarify what specifically you're looking for?",
    "I'd like to help, but I need a bit more context. Could you elaborate?",
];
const TECHNICAL_TEMPLATES: &[&str] = &[
    "Let me break this down technically for you:",
    "From a technical perspective, here's how this works:",
    "Here's the technical explanation you're looking for:",
];
const CREATIVE_TEMPLATES: &[&str] = &[
    "Here's a creative approach to your request:",
    "Let me think creatively about this for you:",
    "I have some interesting ideas for this:",
];

const FALLBACK_REPLIES: &[&str] = &[
    "That's an interesting question! Could you provide more details so I can give you a better response?",
    "I'd be happy to help with that. Could you elaborate on what specific information you're looking for?",
    "Let me help you with that. Can you provide a bit more context about your question?",
    "That sounds like something I can assist with. What would you like to know more about?",
    "I'm here to help! Could you give me more details about what you're looking for?",
];

/// Keyword sets tested in order; the first hit answers.
const RULES: &[(&[&str], &str)] = &[
    (
        &["hello", "hi", "hey"],
        "Hello! How can I assist you today?",
    ),
    (
        &["help", "what can you do"],
        "I'm CipherDepth, your AI assistant. I can help you with questions, provide information, assist with tasks, and engage in conversations. What would you like to know?",
    ),
    (
        &["thank", "thanks"],
        "You're welcome! I'm happy to help. Is there anything else you'd like to know?",
    ),
    (
        &["weather"],
        "I don't have access to real-time weather data, but I'd recommend checking a weather app or website for current conditions in your area.",
    ),
    (
        &["time", "date"],
        "I don't have access to real-time data, but you can check your device's clock for the current time and date.",
    ),
    (
        &["cipher", "encryption"],
        "I'd be happy to help with cryptography and encryption questions! Ciphers are fascinating, from simple Caesar ciphers to modern AES encryption. What specific aspect interests you?",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Pattern,
    Rules,
    KnowledgeBase,
    ChatModel,
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseResult {
    pub text: String,
    pub source: Option<ResponseSource>,
}

impl ResponseResult {
    fn new(text: impl Into<String>, source: ResponseSource) -> Self {
        Self {
            text: text.into(),
            source: Some(source),
        }
    }
}

fn pick(templates: &[&str]) -> String {
    templates
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(LAST_RESORT)
        .to_string()
}

fn templates_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Greeting => GREETING_TEMPLATES,
        Category::Helpful => HELPFUL_TEMPLATES,
        Category::Clarification => CLARIFICATION_TEMPLATES,
        Category::Technical => TECHNICAL_TEMPLATES,
        Category::Creative => CREATIVE_TEMPLATES,
    }
}

/// One way of producing a base reply. `None` passes the input down the chain.
#[async_trait]
pub trait ResponseStrategy: Send + Sync {
    fn source(&self) -> ResponseSource;

    async fn attempt(&self, input: &str) -> Option<String>;
}

pub struct RuleStrategy;

#[async_trait]
impl ResponseStrategy for RuleStrategy {
    fn source(&self) -> ResponseSource {
        ResponseSource::Rules
    }

    async fn attempt(&self, input: &str) -> Option<String> {
        let input = input.to_lowercase();
        RULES
            .iter()
            .find(|(words, _)| words.iter().any(|word| input.contains(word)))
            .map(|(_, reply)| reply.to_string())
    }
}

pub struct KnowledgeBaseStrategy {
    knowledge_base: KnowledgeBase,
}

impl KnowledgeBaseStrategy {
    pub fn new(knowledge_base: KnowledgeBase) -> Self {
        Self { knowledge_base }
    }
}

#[async_trait]
impl ResponseStrategy for KnowledgeBaseStrategy {
    fn source(&self) -> ResponseSource {
        ResponseSource::KnowledgeBase
    }

    async fn attempt(&self, input: &str) -> Option<String> {
        self.knowledge_base.lookup(input).await
    }
}

pub struct ChatModelStrategy {
    connector: Arc<dyn ChatModelConnector>,
}

impl ChatModelStrategy {
    pub fn new(connector: Arc<dyn ChatModelConnector>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl ResponseStrategy for ChatModelStrategy {
    fn source(&self) -> ResponseSource {
        ResponseSource::ChatModel
    }

    async fn attempt(&self, input: &str) -> Option<String> {
        match self.connector.predict(input).await {
            Ok(reply) if !reply.trim().is_empty() => Some(reply),
            Ok(_) => None,
            Err(err) => {
                tracing::error!("Error getting model response: {}", err);
                None
            }
        }
    }
}

pub struct FallbackStrategy;

#[async_trait]
impl ResponseStrategy for FallbackStrategy {
    fn source(&self) -> ResponseSource {
        ResponseSource::Template
    }

    async fn attempt(&self, _input: &str) -> Option<String> {
        Some(pick(FALLBACK_REPLIES))
    }
}

/// Ordered strategies; the first one with an answer wins.
pub struct StrategyChain {
    strategies: Vec<Box<dyn ResponseStrategy>>,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Box<dyn ResponseStrategy>>) -> Self {
        Self { strategies }
    }

    /// rules, knowledge base, chat model, generic templates
    pub fn standard(settings: &ResponderSettings, chat_model: Arc<dyn ChatModelConnector>) -> Self {
        let knowledge_base = KnowledgeBase::new(
            &settings.knowledge_base_path,
            settings.knowledge_base_min_overlap,
        );

        Self::new(vec![
            Box::new(RuleStrategy),
            Box::new(KnowledgeBaseStrategy::new(knowledge_base)),
            Box::new(ChatModelStrategy::new(chat_model)),
            Box::new(FallbackStrategy),
        ])
    }

    pub async fn run(&self, input: &str) -> Option<ResponseResult> {
        for strategy in &self.strategies {
            if let Some(text) = strategy.attempt(input).await {
                return Some(ResponseResult::new(text, strategy.source()));
            }
        }
        None
    }
}

/// Opening sentences of the patterns rated above `threshold`, most frequent
/// first (first seen wins a tie), at most three.
pub fn successful_phrases(patterns: &[ResponsePattern], threshold: f64) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = vec![];

    let openings = patterns
        .iter()
        .filter(|pattern| pattern.success_rate > threshold)
        .filter_map(|pattern| pattern.bot_response.split('.').next())
        .map(str::trim)
        .filter(|sentence| {
            let len = sentence.chars().count();
            len > PHRASE_MIN_LEN && len < PHRASE_MAX_LEN
        });

    for sentence in openings {
        match counts.iter_mut().find(|(phrase, _)| phrase == sentence) {
            Some((_, count)) => *count += 1,
            None => counts.push((sentence.to_string(), 1)),
        }
    }

    // stable: equal counts keep insertion order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MAX_PHRASES)
        .map(|(phrase, _)| phrase)
        .collect()
}

#[derive(Debug, Default)]
pub struct SourceUsage {
    pattern: AtomicU64,
    rules: AtomicU64,
    knowledge_base: AtomicU64,
    chat_model: AtomicU64,
    template: AtomicU64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceUsageCounts {
    pub pattern: u64,
    pub rules: u64,
    pub knowledge_base: u64,
    pub chat_model: u64,
    pub template: u64,
}

impl SourceUsage {
    pub fn record(&self, source: ResponseSource) {
        let counter = match source {
            ResponseSource::Pattern => &self.pattern,
            ResponseSource::Rules => &self.rules,
            ResponseSource::KnowledgeBase => &self.knowledge_base,
            ResponseSource::ChatModel => &self.chat_model,
            ResponseSource::Template => &self.template,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn counts(&self) -> SourceUsageCounts {
        SourceUsageCounts {
            pattern: self.pattern.load(Ordering::Relaxed),
            rules: self.rules.load(Ordering::Relaxed),
            knowledge_base: self.knowledge_base.load(Ordering::Relaxed),
            chat_model: self.chat_model.load(Ordering::Relaxed),
            template: self.template.load(Ordering::Relaxed),
        }
    }
}

/// Shared through `web::Data`; one per process.
pub struct Responder {
    settings: ResponderSettings,
    chain: StrategyChain,
    usage: SourceUsage,
    parameters: RwLock<Option<ModelParameters>>,
}

impl Responder {
    pub fn new(settings: ResponderSettings, chain: StrategyChain) -> Self {
        Self {
            settings,
            chain,
            usage: SourceUsage::default(),
            parameters: RwLock::new(None),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let chat_model = connectors::init_chat_model(&settings.chat_model);
        let chain = StrategyChain::standard(&settings.responder, chat_model);
        Self::new(settings.responder.clone(), chain)
    }

    pub fn settings(&self) -> &ResponderSettings {
        &self.settings
    }

    pub fn usage(&self) -> SourceUsageCounts {
        self.usage.counts()
    }

    /// Parameters of the active snapshot, loaded on first use. A failed load
    /// falls back to defaults and is retried on the next call.
    pub async fn parameters(&self, pool: &PgPool) -> ModelParameters {
        if let Some(parameters) = self.parameters.read().await.as_ref() {
            return parameters.clone();
        }

        // no lock is held while loading; parameters stored meanwhile win
        match db::snapshot::fetch_or_create_active(pool).await {
            Ok(snapshot) => self
                .parameters
                .write()
                .await
                .get_or_insert(snapshot.parameters.0)
                .clone(),
            Err(err) => {
                tracing::error!("Failed to load model parameters: {}", err);
                ModelParameters::default()
            }
        }
    }

    pub async fn set_parameters(&self, parameters: ModelParameters) {
        *self.parameters.write().await = Some(parameters);
    }

    #[tracing::instrument(name = "Select response", skip(self, pool, input))]
    pub async fn respond(&self, pool: &PgPool, input: &str) -> ResponseResult {
        let category = categorize(input);
        let keywords = extract_keywords(input);
        let parameters = self.parameters(pool).await;

        let patterns = db::pattern::fetch_similar(
            pool,
            &keywords,
            category.as_str(),
            parameters.min_samples_for_pattern,
            self.settings.pattern_match_limit,
        )
        .await
        .unwrap_or_else(|err| {
            tracing::error!("Error finding similar patterns: {}", err);
            vec![]
        });

        self.respond_with(input, &patterns).await
    }

    /// Selection over already fetched `patterns`, best first.
    pub async fn respond_with(&self, input: &str, patterns: &[ResponsePattern]) -> ResponseResult {
        let result = self.select(input, patterns).await;
        if let Some(source) = result.source {
            self.usage.record(source);
        }
        result
    }

    async fn select(&self, input: &str, patterns: &[ResponsePattern]) -> ResponseResult {
        let category = categorize(input);

        if let Some(best) = patterns.first() {
            if best.success_rate > self.settings.pattern_success_threshold {
                tracing::info!(
                    "Using successful pattern with {:.2}% success rate",
                    best.success_rate * 100.0
                );
                return ResponseResult::new(best.bot_response.clone(), ResponseSource::Pattern);
            }
        }

        let base = match self.chain.run(input).await {
            Some(base) => base,
            None => return ResponseResult::new(pick(templates_for(category)), ResponseSource::Template),
        };

        if matches!(category, Category::Helpful | Category::Technical) {
            let phrases = successful_phrases(patterns, self.settings.enhancement_threshold);
            if let Some(phrase) = phrases.first() {
                return ResponseResult {
                    text: format!("{}\n\n{}", phrase, base.text),
                    source: base.source,
                };
            }
        }

        if category == Category::Greeting {
            return ResponseResult::new(pick(GREETING_TEMPLATES), ResponseSource::Template);
        }

        base
    }
}
