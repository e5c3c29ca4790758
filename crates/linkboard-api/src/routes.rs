use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::auth::{self, AppState};
use crate::comments;
use crate::error::panic_response;
use crate::middleware::require_auth;
use crate::posts;

/// All API routes. Mutating routes sit behind the bearer-token check, and a
/// panicking handler answers with a JSON 500 instead of dropping the
/// connection.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/posts", get(posts::list_posts))
        .route("/api/posts/", get(posts::list_posts))
        .route("/api/posts/{category}", get(posts::list_category))
        .route("/api/post/{id}", get(posts::get_post))
        .route("/api/user/{login}", get(posts::list_user));

    let protected_routes = Router::new()
        .route("/api/posts", post(posts::create_post))
        .route("/api/post/{id}", post(comments::create_comment))
        .route("/api/post/{id}", delete(posts::delete_post))
        .route("/api/post/{id}/{comment_id}", delete(comments::delete_comment))
        .route("/api/post/{id}/upvote", get(posts::upvote))
        .route("/api/post/{id}/downvote", get(posts::downvote))
        .route("/api/post/{id}/unvote", get(posts::unvote))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}
