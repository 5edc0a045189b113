use super::ChatModelConnector;
use crate::configuration::ChatModelSettings;
use crate::connectors::ConnectorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    output: String,
}

/// Inference endpoint client: `POST {"input": ..}` answered by `{"output": ..}`.
pub struct ChatModelClient {
    url: String,
    http_client: reqwest::Client,
}

impl ChatModelClient {
    pub fn new(settings: &ChatModelSettings) -> Result<Self, ConnectorError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            url: settings.url.clone(),
            http_client,
        })
    }
}

#[async_trait]
impl ChatModelConnector for ChatModelClient {
    #[tracing::instrument(name = "Chat model prediction", skip(self, text))]
    async fn predict(&self, text: &str) -> Result<String, ConnectorError> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&PredictRequest { input: text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::ModelUnavailable(format!(
                "inference endpoint returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| ConnectorError::ModelUnavailable(err.to_string()))?;

        let prediction: PredictResponse = serde_json::from_str(&body)
            .map_err(|err| ConnectorError::InvalidResponse(err.to_string()))?;

        Ok(prediction.output)
    }
}
