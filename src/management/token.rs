use std::path::PathBuf;

use chrono::Utc;

use crate::{config, error::ScoutError, spotify, types::Token};

/// Seconds before the real expiry at which a token is refreshed.
const EXPIRY_MARGIN: u64 = 240;

/// Keeps the OAuth token in `<data dir>/cache/token.json` and refreshes it
/// when it is about to expire.
pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            path: Self::token_path(),
        }
    }

    /// Uses a custom cache location instead of the data directory.
    pub fn with_path(token: Token, path: PathBuf) -> Self {
        Self { token, path }
    }

    pub async fn load() -> Result<Self, ScoutError> {
        Self::load_from(Self::token_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self, ScoutError> {
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| ScoutError::Auth(format!("cannot read {}: {}", path.display(), e)))?;
        let token: Token = serde_json::from_str(&content)
            .map_err(|e| ScoutError::Auth(format!("corrupt token cache: {}", e)))?;
        Ok(Self { token, path })
    }

    pub async fn persist(&self) -> Result<(), ScoutError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and persisting it first if needed.
    pub async fn get_valid_token(&mut self) -> Result<String, ScoutError> {
        if self.is_expired_at(Utc::now().timestamp() as u64) {
            let refreshed = spotify::auth::refresh_token(&self.token.refresh_token).await?;
            self.token = merge_refreshed(&self.token, refreshed);
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        now + EXPIRY_MARGIN >= self.token.obtained_at + self.token.expires_in
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}

/// Spotify may omit the refresh token (and scope) when refreshing; keep the
/// old values in that case.
pub fn merge_refreshed(old: &Token, new: Token) -> Token {
    Token {
        refresh_token: if new.refresh_token.is_empty() {
            old.refresh_token.clone()
        } else {
            new.refresh_token
        },
        scope: if new.scope.is_empty() {
            old.scope.clone()
        } else {
            new.scope
        },
        ..new
    }
}
