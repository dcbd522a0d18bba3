//! Application configuration loaded from environment variables.
//!
//! All values are read once at startup; core logic never does ambient
//! environment lookups.

use std::env;

use crate::services::Credentials;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Long-lived refresh token for the dashboard's single athlete
    pub strava_refresh_token: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first if one is present (local development).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            strava_refresh_token: env::var("STRAVA_REFRESH_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_REFRESH_TOKEN"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// OAuth credentials for the credential manager.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.strava_client_id.clone(),
            client_secret: self.strava_client_secret.clone(),
            refresh_token: self.strava_refresh_token.clone(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("STRAVA_CLIENT_ID", "test_id");
        env::set_var("STRAVA_CLIENT_SECRET", "test_secret");
        env::set_var("STRAVA_REFRESH_TOKEN", "test_refresh");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.strava_client_id, "test_id");
        assert_eq!(config.strava_client_secret, "test_secret");
        assert_eq!(config.strava_refresh_token, "test_refresh");
        assert_eq!(config.port, 8080);

        let creds = config.credentials();
        assert_eq!(creds.client_id, "test_id");
        assert_eq!(creds.refresh_token, "test_refresh");
    }
}
