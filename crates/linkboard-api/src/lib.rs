pub mod auth;
pub mod comments;
pub mod error;
pub mod middleware;
pub mod posts;
pub mod routes;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use routes::router;
