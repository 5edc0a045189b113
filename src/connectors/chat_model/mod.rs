//! Generative chat model reached over HTTP.
//!
//! Used by the response selector as the last lookup before generic templates.

use crate::configuration::ChatModelSettings;
use async_trait::async_trait;
use std::sync::Arc;

pub mod client;
#[cfg(test)]
pub mod mock;

pub use client::ChatModelClient;
#[cfg(test)]
pub use mock::MockChatModel;

use super::ConnectorError;

#[async_trait]
pub trait ChatModelConnector: Send + Sync {
    /// Generate a reply for `text`.
    async fn predict(&self, text: &str) -> Result<String, ConnectorError>;
}

/// Stand-in used when no model is configured.
pub struct DisabledChatModel;

#[async_trait]
impl ChatModelConnector for DisabledChatModel {
    async fn predict(&self, _text: &str) -> Result<String, ConnectorError> {
        Err(ConnectorError::ModelUnavailable(
            "chat model is disabled".to_string(),
        ))
    }
}

pub fn init(settings: &ChatModelSettings) -> Arc<dyn ChatModelConnector> {
    if settings.enabled {
        match ChatModelClient::new(settings) {
            Ok(client) => {
                tracing::info!("Initializing chat model connector: {}", settings.url);
                return Arc::new(client);
            }
            Err(err) => {
                tracing::error!("Failed to build chat model client: {}", err);
            }
        }
    } else {
        tracing::warn!("Chat model connector disabled");
    }

    Arc::new(DisabledChatModel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_model_is_unavailable() {
        let connector = init(&ChatModelSettings::default());
        let err = connector.predict("hello").await.unwrap_err();
        assert!(matches!(err, ConnectorError::ModelUnavailable(_)));
    }
}
