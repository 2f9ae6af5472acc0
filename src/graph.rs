use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{ReplyDeskError, Result};
use crate::models::{Comment, GraphList, GraphPublishRequest, Post};

const POST_FIELDS: &str = "id,message,created_time,attachments{media_type,media,target}";
const COMMENT_FIELDS: &str = "id,message,created_time,from";

#[cfg(test)]
use mockall::automock;

/// Read/write access to the social graph: page posts, post comments, comment replies.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SocialClient: Send + Sync {
    async fn list_posts(&self, page_id: &str, limit: u32) -> Result<Vec<Post>>;
    async fn list_comments(&self, post_id: &str, limit: u32) -> Result<Vec<Comment>>;
    /// Not idempotent: every call creates a new comment upstream.
    async fn publish_reply(&self, comment_id: &str, text: &str) -> Result<bool>;
}

pub struct GraphClient {
    client: Client,
    base_url: Url,
    access_token: String,
}

impl GraphClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.graph.base_url).map_err(|e| {
            ReplyDeskError::Config(format!(
                "Invalid graph base URL {}: {e}",
                config.graph.base_url
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ReplyDeskError::Config(format!(
                "Graph base URL {} cannot carry a path",
                config.graph.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.upstream_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url,
            access_token: config.graph.access_token.clone(),
        })
    }

    /// `{base}/{node}/{edge}` with the node id encoded as a single path segment
    fn edge_url(&self, node: &str, edge: &str) -> Result<Url> {
        // URL normalization would drop these segments and retarget the request
        if node == "." || node == ".." {
            return Err(ReplyDeskError::InvalidInput(format!(
                "graph node id {node:?} cannot be addressed"
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ReplyDeskError::Config("Graph base URL cannot carry a path".into()))?
            .pop_if_empty()
            .push(node)
            .push(edge);
        Ok(url)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        node: &str,
        edge: &str,
        fields: &str,
        limit: u32,
    ) -> Result<Vec<T>> {
        let url = self.edge_url(node, edge)?;
        let limit_param = limit.to_string();
        let response = self
            .client
            .get(url)
            .query(&[
                ("access_token", self.access_token.as_str()),
                ("limit", limit_param.as_str()),
                ("fields", fields),
            ])
            .send()
            .await?;

        let body = ensure_success(response).await?.text().await?;
        let mut list: GraphList<T> = serde_json::from_str(&body)?;
        // The bound holds even when upstream ignores the limit parameter
        list.data.truncate(limit as usize);
        Ok(list.data)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ReplyDeskError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SocialClient for GraphClient {
    async fn list_posts(&self, page_id: &str, limit: u32) -> Result<Vec<Post>> {
        tracing::debug!(page_id, limit, "Fetching page posts");
        self.fetch_list(page_id, "posts", POST_FIELDS, limit).await
    }

    async fn list_comments(&self, post_id: &str, limit: u32) -> Result<Vec<Comment>> {
        tracing::debug!(post_id, limit, "Fetching post comments");
        self.fetch_list(post_id, "comments", COMMENT_FIELDS, limit)
            .await
    }

    async fn publish_reply(&self, comment_id: &str, text: &str) -> Result<bool> {
        tracing::debug!(comment_id, len = text.len(), "Publishing comment reply");
        let url = self.edge_url(comment_id, "comments")?;
        let response = self
            .client
            .post(url)
            .json(&GraphPublishRequest {
                message: text,
                access_token: &self.access_token,
            })
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(true)
    }
}
