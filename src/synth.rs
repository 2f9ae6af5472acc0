use async_trait::async_trait;
use std::sync::Arc;

use crate::config::OpenAIConfig;
use crate::error::Result;
use crate::models::{ChatMessage, ChatRequest};
use crate::transport::Transport;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReplySuggester: Send + Sync {
    /// Draft a reply to a comment. An upstream answer without text yields `""`.
    async fn suggest_reply(&self, comment_text: &str) -> Result<String>;
}

pub struct ReplySynth {
    tx: Arc<dyn Transport>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    token_hint: u32,
}

impl ReplySynth {
    pub fn new(tx: Arc<dyn Transport>, config: &OpenAIConfig) -> Self {
        Self {
            tx,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            token_hint: config.reply_token_hint,
        }
    }

    fn prompt(&self, comment_text: &str) -> String {
        format!(
            "Reply politely in under {} tokens with relevant emojis:\n\"{}\"",
            self.token_hint, comment_text
        )
    }
}

#[async_trait]
impl ReplySuggester for ReplySynth {
    async fn suggest_reply(&self, comment_text: &str) -> Result<String> {
        tracing::info!(
            "Drafting reply with {} for comment of {} chars",
            self.model,
            comment_text.len()
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(self.prompt(comment_text))],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self.tx.chat(&request).await?;

        let reply = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if reply.is_empty() {
            tracing::warn!("Completion returned no reply text");
        }
        Ok(reply)
    }
}
