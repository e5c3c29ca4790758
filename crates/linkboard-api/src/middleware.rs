use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::auth::AppState;
use crate::error::ApiError;

/// Resolve the bearer token to a live session and attach it to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingToken)?;

    let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

    let session = state.sessions.check(token)?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
