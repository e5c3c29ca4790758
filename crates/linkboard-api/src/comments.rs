use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use linkboard_store::Session;
use linkboard_types::api::NewCommentRequest;
use linkboard_types::models::NewComment;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::posts::with_comments;

/// POST /api/post/{id}
pub async fn create_comment(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
    Extension(session): Extension<Session>,
    payload: Result<Json<NewCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(post_id) = path?;
    let Json(req) = payload?;
    if req.comment.is_empty() {
        return Err(ApiError::required("comment"));
    }

    // No orphan comments: the post has to exist first.
    state.posts.read(post_id)?;

    let id = state.comments.create(NewComment {
        post_id,
        author: session.author(),
        body: req.comment,
    })?;
    info!("'{}' commented on post {} (comment {})", session.username, post_id, id);

    let post = state.posts.read(post_id)?;
    Ok((StatusCode::CREATED, Json(with_comments(&state, post)?)))
}

/// DELETE /api/post/{id}/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    path: Result<Path<(u32, u32)>, PathRejection>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let Path((post_id, comment_id)) = path?;
    let comment = state.comments.read(post_id, comment_id)?;
    if comment.author.id != session.user_id {
        return Err(ApiError::Forbidden);
    }

    state.comments.delete(post_id, comment_id)?;

    let post = state.posts.read(post_id)?;
    Ok(Json(with_comments(&state, post)?))
}
