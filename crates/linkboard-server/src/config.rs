use std::path::PathBuf;

use anyhow::{Context, Result};

/// Placeholder JWT secrets that should never reach production.
pub const PLACEHOLDER_SECRETS: &[&str] =
    &["change-me-to-a-random-string", "dev-secret-change-me"];

const DEFAULT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Front-end assets; served under `/static` with `html/index.html` as
    /// the fallback page when set.
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = get("LINKBOARD_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("LINKBOARD_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("LINKBOARD_PORT is not a valid port: '{}'", raw))?,
            None => 8081,
        };
        let jwt_secret = get("LINKBOARD_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SECRET.into());
        let static_dir = get("LINKBOARD_STATIC_DIR")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            jwt_secret,
            static_dir,
        })
    }

    pub fn has_placeholder_secret(&self) -> bool {
        PLACEHOLDER_SECRETS.contains(&self.jwt_secret.as_str())
    }
}
