// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth credential manager for the Strava refresh-token flow.
//!
//! Holds the static client credentials and refresh token, exchanges the
//! refresh token for short-lived access tokens, and caches the current
//! token until it expires. This is the sole owner and sole writer of
//! token state.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::AuthError;

/// Default Strava token endpoint.
const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Static OAuth credentials, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Short-lived bearer token with its expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token is still usable at `now`, with the refresh margin
    /// applied.
    fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Token refresh response from Strava.
///
/// Strava also returns a rotated `refresh_token`; for a single-athlete
/// dashboard the configured token stays valid, so only the fields we
/// consume are deserialized.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_at: i64,
}

/// Exchanges a refresh token for access tokens and caches the result.
pub struct CredentialManager {
    http: reqwest::Client,
    token_url: String,
    credentials: Credentials,
    /// Cached access token, guarded so concurrent requests refresh at most once.
    cached: Mutex<Option<AccessToken>>,
}

impl CredentialManager {
    /// Create a manager pointed at the real Strava token endpoint.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_token_url(credentials, STRAVA_TOKEN_URL)
    }

    /// Create a manager with a custom token endpoint (used in tests).
    pub fn with_token_url(credentials: Credentials, token_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: token_url.into(),
            credentials,
            cached: Mutex::new(None),
        }
    }

    /// Get a valid (non-expired) access token, refreshing if needed.
    ///
    /// A cached token within its validity window is returned without any
    /// network call. On refresh failure nothing is cached and the error
    /// propagates; retry policy is the caller's concern.
    pub async fn get_access_token(&self) -> Result<AccessToken, AuthError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_valid_at(Utc::now()) {
                return Ok(token.clone());
            }
        }

        let fresh = self.refresh().await?;
        *cached = Some(fresh.clone());
        Ok(fresh)
    }

    /// Discard any cached token and perform the exchange unconditionally.
    ///
    /// Used after Strava rejects a token that our clock still considered
    /// valid (revocation, clock skew).
    pub async fn force_refresh(&self) -> Result<AccessToken, AuthError> {
        let mut cached = self.cached.lock().await;
        cached.take();

        let fresh = self.refresh().await?;
        *cached = Some(fresh.clone());
        Ok(fresh)
    }

    /// Perform the refresh-token exchange against the token endpoint.
    async fn refresh(&self) -> Result<AccessToken, AuthError> {
        tracing::debug!("Refreshing Strava access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, "Strava refused the refresh token");
            return Err(AuthError::RefreshRejected { status, body });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        let expires_at = DateTime::from_timestamp(token.expires_at, 0).ok_or_else(|| {
            AuthError::MalformedResponse(format!("invalid expires_at: {}", token.expires_at))
        })?;

        tracing::info!(expires_at = %expires_at, "Access token refreshed");

        Ok(AccessToken {
            token: token.access_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_validity_window() {
        let now = Utc::now();
        let token = AccessToken {
            token: "abc".to_string(),
            expires_at: now + Duration::hours(1),
        };
        assert!(token.is_valid_at(now));

        // Inside the refresh margin counts as expired.
        let expiring = AccessToken {
            token: "abc".to_string(),
            expires_at: now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS - 1),
        };
        assert!(!expiring.is_valid_at(now));

        let expired = AccessToken {
            token: "abc".to_string(),
            expires_at: now - Duration::seconds(1),
        };
        assert!(!expired.is_valid_at(now));
    }
}
