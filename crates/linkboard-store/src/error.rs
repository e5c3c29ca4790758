use std::fmt;

use thiserror::Error;

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Post,
    Comment,
    Vote,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::User => "user",
            Resource::Post => "post",
            Resource::Comment => "comment",
            Resource::Vote => "vote",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no {0} found")]
    NotFound(Resource),

    #[error("user already exists")]
    AlreadyExists,

    #[error("invalid password")]
    WrongPassword,

    #[error("invalid jwt token")]
    InvalidToken,

    #[error("bad sign method")]
    BadSignature,

    #[error("no payload")]
    NoPayload,

    #[error("no session found")]
    NoAuth,

    /// A writer panicked while holding a store lock.
    #[error("store lock poisoned")]
    Poisoned,

    #[error("failed to sign session token: {0}")]
    Signing(String),
}

impl StoreError {
    /// True for failures caused by the caller's credentials or token rather
    /// than by missing data or server faults.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            StoreError::WrongPassword
                | StoreError::InvalidToken
                | StoreError::BadSignature
                | StoreError::NoPayload
                | StoreError::NoAuth
        )
    }
}
