use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};

use crate::error::{Operation, OperationError, ReplyDeskError};
use crate::models::{Comment, ListParams, Post};
use crate::service::ReplyDeskService;

/// GET /api/posts
pub async fn list_posts(
    State(service): State<ReplyDeskService>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Post>>, OperationError> {
    let Query(params) = params.map_err(|e| limit_error(Operation::ListPosts, e))?;
    service.list_posts(params.limit).await.map(Json)
}

/// GET /api/posts/:post_id/comments
pub async fn list_comments(
    State(service): State<ReplyDeskService>,
    post_id: Result<Path<String>, PathRejection>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Comment>>, OperationError> {
    let Path(post_id) = post_id.map_err(|e| path_error(Operation::ListComments, e))?;
    let Query(params) = params.map_err(|e| limit_error(Operation::ListComments, e))?;
    service.list_comments(&post_id, params.limit).await.map(Json)
}

/// Undecodable path ids fail the operation like any other bad input
pub(crate) fn path_error(operation: Operation, rejection: PathRejection) -> OperationError {
    OperationError::new(
        operation,
        ReplyDeskError::InvalidInput(rejection.body_text()),
    )
}

fn limit_error(operation: Operation, rejection: QueryRejection) -> OperationError {
    OperationError::new(
        operation,
        ReplyDeskError::InvalidInput(rejection.body_text()),
    )
}
