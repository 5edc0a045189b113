pub mod categorizer;
pub mod chat;
pub mod feedback;
pub mod keywords;
pub mod knowledge_base;
pub mod response_selector;
pub mod trainer;

pub use categorizer::{categorize, Category};
pub use chat::ChatError;
pub use feedback::FeedbackError;
pub use keywords::extract_keywords;
pub use knowledge_base::KnowledgeBase;
pub use response_selector::{Responder, ResponseResult, ResponseSource};
pub use trainer::{ModelPerformance, TrainerError};
