use std::any::Any;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use linkboard_store::StoreError;
use linkboard_types::api::{FieldError, MessageResponse, ValidationErrors};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("authorization token missing")]
    MissingToken,

    #[error("only the author can do that")]
    Forbidden,

    /// A required body field was missing or empty.
    #[error("{param} {msg}")]
    Validation {
        param: &'static str,
        msg: &'static str,
    },

    /// The request could not be extracted: malformed JSON, a wrong
    /// content type or a path segment of the wrong type.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn required(param: &'static str) -> Self {
        ApiError::Validation {
            param,
            msg: "is required",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(err) => match err {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::AlreadyExists => StatusCode::CONFLICT,
                StoreError::Poisoned | StoreError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ if err.is_auth_failure() => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let ApiError::Validation { param, msg } = self {
            let body = ValidationErrors {
                errors: vec![FieldError {
                    location: "body".into(),
                    param: param.into(),
                    msg: msg.into(),
                }],
            };
            return (status, Json(body)).into_response();
        }

        // Server faults are logged but never described to the client.
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

/// Turns a handler panic into the same redacted 500 body as any other
/// server fault. Installed with `CatchPanicLayer::custom`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "handler panicked");

    let body = MessageResponse {
        message: "internal server error".to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use linkboard_store::Resource;

    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::NotFound(Resource::Post), StatusCode::NOT_FOUND),
            (StoreError::NotFound(Resource::Vote), StatusCode::NOT_FOUND),
            (StoreError::AlreadyExists, StatusCode::CONFLICT),
            (StoreError::WrongPassword, StatusCode::UNAUTHORIZED),
            (StoreError::InvalidToken, StatusCode::UNAUTHORIZED),
            (StoreError::BadSignature, StatusCode::UNAUTHORIZED),
            (StoreError::NoPayload, StatusCode::UNAUTHORIZED),
            (StoreError::NoAuth, StatusCode::UNAUTHORIZED),
            (StoreError::Poisoned, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn rejections_keep_their_status() {
        let err = ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid URL".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid URL");
    }

    #[test]
    fn panics_become_internal_errors() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_is_unprocessable() {
        let response = ApiError::required("comment").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
