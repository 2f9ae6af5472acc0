use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::error::{ReplyDeskError, Result};
use crate::models::{ChatRequest, ChatResponse};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse>;
}

/// Chat completions over HTTP. One attempt per call, bounded by the upstream timeout.
pub struct OpenAITransport {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenAITransport {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.upstream_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                config.openai.base_url.trim_end_matches('/')
            ),
            api_key: config.openai.api_key.clone(),
        })
    }
}

#[async_trait]
impl Transport for OpenAITransport {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReplyDeskError::Status {
                status: status.as_u16(),
                body: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            ReplyDeskError::Shape(format!("Failed to parse chat completion response: {e}"))
        })
    }
}
