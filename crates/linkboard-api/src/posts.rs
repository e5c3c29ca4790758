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
use linkboard_types::api::{MessageResponse, NewPostRequest, PostResponse};
use linkboard_types::models::{NewPost, Post, PostKind, VoteDirection};

use crate::auth::AppState;
use crate::error::ApiError;

/// Attach the post's comments for the response.
pub(crate) fn with_comments(state: &AppState, post: Post) -> Result<PostResponse, ApiError> {
    let comments = state.comments.read_all(post.id)?;
    Ok(PostResponse::new(post, comments))
}

fn join_comments(state: &AppState, posts: Vec<Post>) -> Result<Vec<PostResponse>, ApiError> {
    let mut comments = state.comments.list()?;
    Ok(posts
        .into_iter()
        .map(|post| {
            let post_comments = comments.remove(&post.id).unwrap_or_default();
            PostResponse::new(post, post_comments)
        })
        .collect())
}

/// GET /api/posts
pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state.posts.read_all()?;
    Ok(Json(join_comments(&state, posts)?))
}

/// GET /api/posts/{category}
pub async fn list_category(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(category) = path?;
    let posts = state.posts.read_category(&category)?;
    Ok(Json(join_comments(&state, posts)?))
}

/// GET /api/user/{login}
pub async fn list_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(login) = path?;
    let posts = state.posts.read_user(&login)?;
    Ok(Json(join_comments(&state, posts)?))
}

/// POST /api/posts. The author's own upvote is recorded straight away.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<NewPostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    if req.title.is_empty() {
        return Err(ApiError::required("title"));
    }
    if req.category.is_empty() {
        return Err(ApiError::required("category"));
    }

    let (data, field) = match req.kind {
        PostKind::Text => (req.text, "text"),
        PostKind::Link => (req.url, "url"),
    };
    let data = data
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::required(field))?;

    let author = session.author();
    let id = state.posts.create(NewPost {
        title: req.title,
        category: req.category,
        kind: req.kind,
        data,
        author: author.clone(),
    })?;
    let post = state.posts.upvote(id, &author)?;

    info!("'{}' published post {}", author.username, id);
    Ok((StatusCode::CREATED, Json(with_comments(&state, post)?)))
}

/// GET /api/post/{id}
pub async fn get_post(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let post = state.posts.view(id)?;
    Ok(Json(with_comments(&state, post)?))
}

/// DELETE /api/post/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let post = state.posts.read(id)?;
    if post.author.id != session.user_id {
        return Err(ApiError::Forbidden);
    }

    state.posts.delete(id)?;
    state.comments.delete_post(id)?;
    Ok(Json(MessageResponse {
        message: "success".into(),
    }))
}

fn cast(
    state: &AppState,
    id: u32,
    session: &Session,
    direction: VoteDirection,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.posts.vote(id, &session.author(), direction)?;
    Ok(Json(with_comments(state, post)?))
}

/// GET /api/post/{id}/upvote
pub async fn upvote(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    cast(&state, id, &session, VoteDirection::Up)
}

/// GET /api/post/{id}/downvote
pub async fn downvote(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    cast(&state, id, &session, VoteDirection::Down)
}

/// GET /api/post/{id}/unvote
pub async fn unvote(
    State(state): State<AppState>,
    path: Result<Path<u32>, PathRejection>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    cast(&state, id, &session, VoteDirection::None)
}
