use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplyDeskError>;

/// Errors raised while talking to the graph or completion APIs.
#[derive(Debug, Error)]
pub enum ReplyDeskError {
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected upstream payload: {0}")]
    Shape(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stable classification of [`ReplyDeskError`], used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Status,
    Shape,
    InvalidInput,
    Config,
}

impl ReplyDeskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Status { .. } => ErrorKind::Status,
            Self::Shape(_) => ErrorKind::Shape,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<serde_json::Error> for ReplyDeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Shape(err.to_string())
    }
}

/// The four caller-facing operations. Each has exactly one error message on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListPosts,
    ListComments,
    PublishReply,
    SuggestReply,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::ListPosts => "Failed to fetch posts.",
            Operation::ListComments => "Failed to fetch comments.",
            Operation::PublishReply => "Failed to reply.",
            Operation::SuggestReply => "OpenAI error.",
        }
    }
}

/// An operation failure as seen at the HTTP boundary.
///
/// The cause is kept for logging; the response only ever carries the
/// operation's generic message with status 500.
#[derive(Debug, Error)]
#[error("{}: {}", .operation.failure_message(), .source)]
pub struct OperationError {
    pub operation: Operation,
    #[source]
    pub source: ReplyDeskError,
}

impl OperationError {
    pub fn new(operation: Operation, source: ReplyDeskError) -> Self {
        Self { operation, source }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

impl IntoResponse for OperationError {
    fn into_response(self) -> Response {
        tracing::error!(
            operation = ?self.operation,
            kind = ?self.kind(),
            "{}",
            self.source
        );
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.operation.failure_message() })),
        )
            .into_response()
    }
}
