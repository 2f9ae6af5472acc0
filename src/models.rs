use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder shown for comments whose author the graph API does not disclose
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Graph API timestamps look like `2024-03-01T10:15:00+0000`
mod graph_time {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

    pub fn serialize<S>(
        value: &Option<DateTime<FixedOffset>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| {
            DateTime::parse_from_str(&s, FORMAT)
                .or_else(|_| DateTime::parse_from_rfc3339(&s))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

/// Flexible limit deserializer: query strings deliver numbers as text, JSON clients as integers
fn deserialize_flexible_limit<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleLimit {
        Int(u32),
        String(String),
    }

    match Option::<FlexibleLimit>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FlexibleLimit::Int(i)) => Ok(Some(i)),
        Some(FlexibleLimit::String(s)) if s.trim().is_empty() => Ok(None),
        Some(FlexibleLimit::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Treats an explicit `null` like a missing key
fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A post on the managed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        with = "graph_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Attachments>,
}

impl Post {
    /// Source URL of the first attached image, if the post has one
    pub fn image_url(&self) -> Option<&str> {
        self.attachments
            .as_ref()?
            .data
            .first()?
            .media
            .as_ref()?
            .image
            .as_ref()?
            .src
            .as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attachments {
    #[serde(default)]
    pub data: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<AttachmentTarget>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Media {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttachmentTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A comment under a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub message: String,
    #[serde(
        default,
        with = "graph_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_time: Option<DateTime<FixedOffset>>,
    #[serde(rename = "from", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl Comment {
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .unwrap_or(ANONYMOUS_AUTHOR)
    }

    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref()?.id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Graph API list envelope; `data` may be missing or null
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphList<T> {
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub data: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct GraphPublishRequest<'a> {
    pub message: &'a str,
    pub access_token: &'a str,
}

// Chat message format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }
}

// Chat completion request format
#[derive(Debug, Serialize, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

// Chat completion response format
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

/// Query parameters accepted by the list routes
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default, deserialize_with = "deserialize_flexible_limit")]
    pub limit: Option<u32>,
}

/// Body of the reply and generate-reply routes
#[derive(Debug, Default, Deserialize)]
pub struct TextBody {
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PublishResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SuggestionResponse {
    pub reply: String,
}
