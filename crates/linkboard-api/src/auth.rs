use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use linkboard_store::{CommentStore, PostStore, SessionManager, UserStore};
use linkboard_types::api::{LoginRequest, RegisterRequest, TokenResponse};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

/// Every store the handlers need, built once at startup.
pub struct AppStateInner {
    pub users: UserStore,
    pub sessions: SessionManager,
    pub posts: PostStore,
    pub comments: CommentStore,
}

impl AppStateInner {
    pub fn new(jwt_secret: &str) -> AppState {
        Arc::new(Self {
            users: UserStore::new(),
            sessions: SessionManager::new(jwt_secret.as_bytes()),
            posts: PostStore::new(),
            comments: CommentStore::new(),
        })
    }
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    if req.username.is_empty() {
        return Err(ApiError::required("username"));
    }
    if req.password.is_empty() {
        return Err(ApiError::required("password"));
    }

    let user = state.users.create_user(&req.username, &req.password)?;
    let session = state.sessions.create(user.id, &user.username)?;

    info!("Registered '{}', session {}", user.username, session.id);
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token: session.token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let user = state.users.authorize(&req.username, &req.password)?;
    let session = state.sessions.create(user.id, &user.username)?;

    info!("Login for '{}', session {}", user.username, session.id);
    Ok(Json(TokenResponse {
        token: session.token,
    }))
}
