use std::sync::Arc;

use crate::config::Config;
use crate::error::{Operation, OperationError, ReplyDeskError, Result};
use crate::graph::{GraphClient, SocialClient};
use crate::models::{Comment, Post};
use crate::synth::{ReplySuggester, ReplySynth};
use crate::transport::{OpenAITransport, Transport};

/// Orchestrates the four caller-facing operations.
///
/// Every operation issues exactly one upstream call and keeps no state between
/// requests; the clients and configuration are shared read-only.
#[derive(Clone)]
pub struct ReplyDeskService {
    social: Arc<dyn SocialClient>,
    suggester: Arc<dyn ReplySuggester>,
    page_id: String,
    default_post_limit: u32,
    default_comment_limit: u32,
}

impl ReplyDeskService {
    /// Build the service with HTTP clients for both upstreams
    pub fn from_config(config: &Config) -> Result<Self> {
        tracing::info!("Creating graph client");
        let social = Arc::new(GraphClient::new(config)?);

        tracing::info!("Creating completion transport");
        let transport = Arc::new(OpenAITransport::new(config)?);
        let suggester = Arc::new(ReplySynth::new(
            transport as Arc<dyn Transport>,
            &config.openai,
        ));

        Ok(Self::new(social, suggester, config))
    }

    pub fn new(
        social: Arc<dyn SocialClient>,
        suggester: Arc<dyn ReplySuggester>,
        config: &Config,
    ) -> Self {
        Self {
            social,
            suggester,
            page_id: config.graph.page_id.clone(),
            default_post_limit: config.graph.default_post_limit,
            default_comment_limit: config.graph.default_comment_limit,
        }
    }

    pub async fn list_posts(
        &self,
        limit: Option<u32>,
    ) -> std::result::Result<Vec<Post>, OperationError> {
        let limit = effective_limit(limit, self.default_post_limit);
        tracing::info!("Listing up to {} posts for page {}", limit, self.page_id);

        let posts = self
            .social
            .list_posts(&self.page_id, limit)
            .await
            .map_err(|e| OperationError::new(Operation::ListPosts, e))?;

        tracing::info!(
            "Fetched {} posts ({} with images)",
            posts.len(),
            posts.iter().filter(|p| p.image_url().is_some()).count()
        );
        Ok(posts)
    }

    pub async fn list_comments(
        &self,
        post_id: &str,
        limit: Option<u32>,
    ) -> std::result::Result<Vec<Comment>, OperationError> {
        if post_id.trim().is_empty() {
            return Err(OperationError::new(
                Operation::ListComments,
                ReplyDeskError::InvalidInput("post id must not be empty".to_string()),
            ));
        }

        let limit = effective_limit(limit, self.default_comment_limit);
        tracing::info!("Listing up to {} comments for post {}", limit, post_id);

        let comments = self
            .social
            .list_comments(post_id, limit)
            .await
            .map_err(|e| OperationError::new(Operation::ListComments, e))?;

        tracing::info!("Fetched {} comments for post {}", comments.len(), post_id);
        Ok(comments)
    }

    /// Empty input is forwarded to the prompt as-is.
    pub async fn suggest_reply(&self, text: &str) -> std::result::Result<String, OperationError> {
        self.suggester
            .suggest_reply(text)
            .await
            .map_err(|e| OperationError::new(Operation::SuggestReply, e))
    }

    /// Empty replies are forwarded upstream unchanged.
    pub async fn publish_reply(
        &self,
        comment_id: &str,
        text: &str,
    ) -> std::result::Result<bool, OperationError> {
        tracing::info!("Publishing reply to comment {}", comment_id);
        if text.is_empty() {
            tracing::warn!("Publishing empty reply to comment {}", comment_id);
        }

        let success = self
            .social
            .publish_reply(comment_id, text)
            .await
            .map_err(|e| OperationError::new(Operation::PublishReply, e))?;

        tracing::info!("Reply to comment {} published: {}", comment_id, success);
        Ok(success)
    }
}

/// `None` and `0` select the default; anything else passes through unclamped.
fn effective_limit(requested: Option<u32>, default: u32) -> u32 {
    match requested {
        Some(limit) if limit > 0 => limit,
        _ => default,
    }
}
