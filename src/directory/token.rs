//! OAuth2 client-credentials token cache for the directory API.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::errors::AppError;

/// Tokens are retired this long before their nominal expiry so an in-flight
/// request never carries a token that lapses mid-call.
const EXPIRY_MARGIN_SECONDS: i64 = 60;

/// Wire shape of the token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Process-wide cache of the directory bearer credential.
///
/// The cache slot is guarded by an async mutex held across the refresh
/// round-trip: concurrent callers that all observe an expired token collapse
/// to a single in-flight refresh request.
pub struct TokenCache {
    client: reqwest::Client,
    token_url: String,
    credentials: Option<(String, String)>,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(
        client: reqwest::Client,
        token_url: String,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            client,
            token_url,
            credentials: client_id.zip(client_secret),
            cached: Mutex::new(None),
        }
    }

    /// Return a valid, non-expired bearer credential, refreshing if needed.
    pub async fn bearer(&self) -> Result<String, AppError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.refresh().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);

        Ok(access_token)
    }

    async fn refresh(&self) -> Result<CachedToken, AppError> {
        let Some((client_id, client_secret)) = self.credentials.as_ref() else {
            return Err(AppError::Directory(
                "OAuth client credentials are not configured".to_string(),
            ));
        };

        tracing::debug!("Refreshing directory access token");

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Directory(format!(
                "Token endpoint returned {}",
                status
            )));
        }

        let body = response.bytes().await?;
        let token: TokenResponse = serde_json::from_slice(&body)
            .map_err(|e| AppError::MalformedUpstream(format!("Malformed token response: {}", e)))?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in - EXPIRY_MARGIN_SECONDS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_expiring_in(seconds: i64) -> CachedToken {
        CachedToken {
            access_token: "tok".to_string(),
            expires_at: Utc::now() + Duration::seconds(seconds),
        }
    }

    #[test]
    fn test_fresh_token() {
        assert!(token_expiring_in(3600).is_fresh(Utc::now()));
    }

    #[test]
    fn test_expired_token() {
        assert!(!token_expiring_in(-1).is_fresh(Utc::now()));
    }

    #[tokio::test]
    async fn test_missing_credentials_error() {
        let cache = TokenCache::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1/oauth/token".to_string(),
            None,
            None,
        );

        let err = cache.bearer().await.unwrap_err();
        assert!(err.message().contains("not configured"));
    }
}
