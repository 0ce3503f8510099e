//! Configuration module for the council backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL of the external directory API
    pub directory_url: String,
    /// OAuth2 token endpoint for the directory API
    pub oauth_token_url: String,
    /// OAuth2 client credentials (required for member verification)
    pub oauth_client_id: Option<String>,
    pub oauth_client_secret: Option<String>,
    /// Login granted Administrator at startup, with a logged session token
    pub bootstrap_admin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("COUNCIL_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let bind_addr = env::var("COUNCIL_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid COUNCIL_BIND_ADDR format");

        let log_level = env::var("COUNCIL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let directory_url = env::var("COUNCIL_DIRECTORY_URL")
            .unwrap_or_else(|_| "https://api.intra.42.fr/v2".to_string());

        let oauth_token_url = env::var("COUNCIL_OAUTH_TOKEN_URL")
            .unwrap_or_else(|_| "https://api.intra.42.fr/oauth/token".to_string());

        let oauth_client_id = env::var("COUNCIL_OAUTH_CLIENT_ID").ok();
        let oauth_client_secret = env::var("COUNCIL_OAUTH_CLIENT_SECRET").ok();

        let bootstrap_admin = env::var("COUNCIL_BOOTSTRAP_ADMIN").ok();

        Self {
            db_path,
            bind_addr,
            log_level,
            directory_url,
            oauth_token_url,
            oauth_client_id,
            oauth_client_secret,
            bootstrap_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("COUNCIL_DB_PATH");
        env::remove_var("COUNCIL_BIND_ADDR");
        env::remove_var("COUNCIL_LOG_LEVEL");
        env::remove_var("COUNCIL_DIRECTORY_URL");
        env::remove_var("COUNCIL_OAUTH_TOKEN_URL");
        env::remove_var("COUNCIL_OAUTH_CLIENT_ID");
        env::remove_var("COUNCIL_OAUTH_CLIENT_SECRET");
        env::remove_var("COUNCIL_BOOTSTRAP_ADMIN");

        let config = Config::from_env();

        assert_eq!(config.db_path, PathBuf::from("./data/app.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.directory_url, "https://api.intra.42.fr/v2");
        assert_eq!(config.oauth_token_url, "https://api.intra.42.fr/oauth/token");
        assert!(config.oauth_client_id.is_none());
        assert!(config.bootstrap_admin.is_none());
    }
}
