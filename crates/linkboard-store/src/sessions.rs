use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use linkboard_types::api::{Claims, ClaimsUser};
use linkboard_types::models::Author;

use crate::{Result, StoreError, Table};

/// Lifetime of an issued token.
pub const SESSION_TTL_DAYS: i64 = 7;

const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: u32,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Signed token handed to the client.
    pub token: String,
}

impl Session {
    pub fn author(&self) -> Author {
        Author {
            id: self.user_id,
            username: self.username.clone(),
        }
    }
}

/// Issues signed session tokens and maps them back to live sessions.
///
/// The session table lives only in memory: after a restart every token is
/// still cryptographically valid but resolves to `NoAuth`. Sessions are not
/// swept on expiry; the token's own `exp` claim is what rejects them.
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    table: Table<HashMap<String, Session>>,
}

impl SessionManager {
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::days(SESSION_TTL_DAYS))
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        info!("Session manager created (ttl {}h)", ttl.num_hours());
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
            table: Table::default(),
        }
    }

    pub fn create(&self, user_id: u32, username: &str) -> Result<Session> {
        let issued_at = now_seconds();
        let expires_at = issued_at + self.ttl;
        let id = Uuid::new_v4().to_string();

        let claims = Claims {
            user: ClaimsUser {
                username: username.to_string(),
                id: user_id,
            },
            sess_id: id.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| StoreError::Signing(e.to_string()))?;

        let session = Session {
            id,
            user_id,
            username: username.to_string(),
            issued_at,
            expires_at,
            token,
        };

        self.table.with_write(|sessions| {
            sessions.insert(session.id.clone(), session.clone());
            Ok(())
        })?;

        info!("Created session for user {} ('{}')", user_id, username);
        Ok(session)
    }

    /// Verify a bearer token and resolve it to the session it was issued for.
    pub fn check(&self, token: &str) -> Result<Session> {
        let header = decode_header(token).map_err(|e| {
            debug!("check: unreadable token header: {}", e);
            StoreError::InvalidToken
        })?;

        if header.alg != TOKEN_ALGORITHM {
            warn!("check: unexpected signing algorithm {:?}", header.alg);
            return Err(StoreError::BadSignature);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::new(TOKEN_ALGORITHM))
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidAlgorithm => StoreError::BadSignature,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => StoreError::NoPayload,
                _ => {
                    debug!("check: token rejected: {}", e);
                    StoreError::InvalidToken
                }
            })?
            .claims;

        self.table.with_read(|sessions| {
            sessions.get(&claims.sess_id).cloned().ok_or_else(|| {
                warn!("check: no live session '{}'", claims.sess_id);
                StoreError::NoAuth
            })
        })
    }

    /// Number of sessions held in memory.
    pub fn len(&self) -> Result<usize> {
        self.table.with_read(|sessions| Ok(sessions.len()))
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }
}

// Token timestamps have whole-second precision; keep the session record in
// step with what the token says.
fn now_seconds() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_opt(now.timestamp(), 0).single().unwrap_or(now)
}
