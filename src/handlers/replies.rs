use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use super::posts::path_error;
use crate::error::{Operation, OperationError, ReplyDeskError};
use crate::models::{PublishResponse, SuggestionResponse, TextBody};
use crate::service::ReplyDeskService;

/// POST /api/comments/:comment_id/reply
pub async fn publish_reply(
    State(service): State<ReplyDeskService>,
    comment_id: Result<Path<String>, PathRejection>,
    body: Result<Json<TextBody>, JsonRejection>,
) -> Result<Json<PublishResponse>, OperationError> {
    let Path(comment_id) = comment_id.map_err(|e| path_error(Operation::PublishReply, e))?;
    let Json(body) = body.map_err(|e| body_error(Operation::PublishReply, e))?;
    let success = service.publish_reply(&comment_id, &body.text).await?;
    Ok(Json(PublishResponse { success }))
}

/// POST /api/generate-reply
pub async fn generate_reply(
    State(service): State<ReplyDeskService>,
    body: Result<Json<TextBody>, JsonRejection>,
) -> Result<Json<SuggestionResponse>, OperationError> {
    let Json(body) = body.map_err(|e| body_error(Operation::SuggestReply, e))?;
    let reply = service.suggest_reply(&body.text).await?;
    Ok(Json(SuggestionResponse { reply }))
}

fn body_error(operation: Operation, rejection: JsonRejection) -> OperationError {
    OperationError::new(
        operation,
        ReplyDeskError::InvalidInput(rejection.body_text()),
    )
}
