//! External directory client.
//!
//! Verifies candidate logins against the directory API and fetches the
//! profile attributes a new member record is built from. Owns transport
//! details only: token handling, URL construction, status mapping, and
//! response decoding.

mod token;

pub use token::TokenCache;

use serde::Deserialize;

use crate::config::Config;
use crate::errors::AppError;

/// Request timeout for directory calls.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Profile returned by a successful directory lookup.
///
/// Every field is required; a success response missing one fails as
/// malformed upstream rather than propagating into a half-empty member row.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalProfile {
    /// Login as canonicalized by the directory; may differ in case from the
    /// lookup input.
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub image: ProfileImage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileImage {
    pub link: String,
}

/// HTTP client for the external directory.
pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: String,
    tokens: TokenCache,
}

impl DirectoryClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let tokens = TokenCache::new(
            client.clone(),
            config.oauth_token_url.clone(),
            config.oauth_client_id.clone(),
            config.oauth_client_secret.clone(),
        );

        Ok(Self {
            client,
            base_url: config.directory_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Look up a login in the directory.
    ///
    /// Returns `Ok(None)` for every non-success response; the directory does
    /// not let us distinguish deleted, suspended, and never-existed accounts.
    pub async fn lookup(&self, login: &str) -> Result<Option<ExternalProfile>, AppError> {
        let token = self.tokens.bearer().await?;

        let url = self.user_url(login)?;

        let response = self.client.get(url).bearer_auth(&token).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(login, %status, "Directory lookup non-success");
            return Ok(None);
        }

        let body = response.bytes().await?;
        let profile: ExternalProfile = serde_json::from_slice(&body).map_err(|e| {
            AppError::MalformedUpstream(format!("Malformed directory profile: {}", e))
        })?;

        Ok(Some(profile))
    }

    /// Build the lookup URL with the login percent-encoded as a path segment.
    fn user_url(&self, login: &str) -> Result<reqwest::Url, AppError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| AppError::Directory(format!("Invalid directory URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Directory("Directory URL cannot be a base".to_string()))?
            .push("users")
            .push(login);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_base(base: &str) -> DirectoryClient {
        let config = Config {
            db_path: "./unused.sqlite".into(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            directory_url: base.to_string(),
            oauth_token_url: "http://127.0.0.1:1/oauth/token".to_string(),
            oauth_client_id: None,
            oauth_client_secret: None,
            bootstrap_admin: None,
        };
        DirectoryClient::new(&config).unwrap()
    }

    #[test]
    fn test_user_url_encodes_login() {
        let client = client_with_base("https://directory.example/v2");
        let url = client.user_url("jdoe").unwrap();
        assert_eq!(url.as_str(), "https://directory.example/v2/users/jdoe");

        let encoded = client.user_url("j doe/../x").unwrap();
        assert_eq!(
            encoded.as_str(),
            "https://directory.example/v2/users/j%20doe%2F..%2Fx"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let client = client_with_base("https://directory.example/v2/");
        let url = client.user_url("jdoe").unwrap();
        assert_eq!(url.as_str(), "https://directory.example/v2/users/jdoe");
    }

    #[test]
    fn test_profile_requires_all_fields() {
        let missing_email = serde_json::json!({
            "login": "jdoe",
            "first_name": "Jane",
            "last_name": "Doe",
            "image": { "link": "http://x/p.png" }
        });
        assert!(serde_json::from_value::<ExternalProfile>(missing_email).is_err());

        let complete = serde_json::json!({
            "login": "jdoe",
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane@x.com",
            "image": { "link": "http://x/p.png" }
        });
        let profile: ExternalProfile = serde_json::from_value(complete).unwrap();
        assert_eq!(profile.image.link, "http://x/p.png");
    }
}
