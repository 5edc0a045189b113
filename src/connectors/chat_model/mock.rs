use super::ChatModelConnector;
use crate::connectors::ConnectorError;
use async_trait::async_trait;

/// Answers every prompt with the same reply, or fails every time.
pub struct MockChatModel {
    reply: Option<String>,
}

impl MockChatModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl ChatModelConnector for MockChatModel {
    async fn predict(&self, _text: &str) -> Result<String, ConnectorError> {
        self.reply
            .clone()
            .ok_or_else(|| ConnectorError::ModelUnavailable("mock failure".to_string()))
    }
}
