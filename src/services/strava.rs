// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching athlete activities.
//!
//! Handles:
//! - Paginated activity fetching with typed responses
//! - Rate limit detection (429)
//! - One refresh-and-retry when Strava rejects the access token

use serde::de::DeserializeOwned;

use crate::error::{AuthError, FetchError};
use crate::models::Activity;
use crate::services::auth::{CredentialManager, Credentials};

/// Default Strava API base URL.
const STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";

/// Low-level Strava API client. Callers supply a valid access token.
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
}

impl StravaClient {
    /// Create a client against the real Strava API.
    pub fn new() -> Self {
        Self::with_base_url(STRAVA_API_BASE)
    }

    /// Create a client with a custom base URL (used in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// List the athlete's activities, most recent first (Strava's default
    /// ordering, preserved as returned).
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, FetchError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FetchError> {
        let status = response.status();

        if !status.is_success() {
            if status.as_u16() == 401 {
                return Err(FetchError::Auth(AuthError::TokenRejected));
            }

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(FetchError::RateLimited);
            }

            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}

impl Default for StravaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// High-level Strava service that pairs the API client with the credential
/// manager: every fetch goes out with a valid token, and a 401 triggers
/// exactly one refresh-and-retry before the auth failure surfaces.
pub struct StravaService {
    client: StravaClient,
    auth: CredentialManager,
}

impl StravaService {
    /// Create a service against the real Strava endpoints.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: StravaClient::new(),
            auth: CredentialManager::new(credentials),
        }
    }

    /// Create a service with custom endpoints (used in tests).
    pub fn with_endpoints(
        credentials: Credentials,
        token_url: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: StravaClient::with_base_url(api_base_url),
            auth: CredentialManager::with_token_url(credentials, token_url),
        }
    }

    /// Fetch one page of activities, refreshing the token once on a 401.
    pub async fn list_activities(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, FetchError> {
        let token = self.auth.get_access_token().await?;

        match self.client.list_activities(&token.token, page, per_page).await {
            Err(FetchError::Auth(_)) => {
                tracing::info!("Access token rejected upstream, refreshing and retrying once");
                let token = self.auth.force_refresh().await?;
                self.client.list_activities(&token.token, page, per_page).await
            }
            result => result,
        }
    }

    /// Fetch all activities by paging until a short page, preserving
    /// Strava's most-recent-first ordering across pages.
    pub async fn list_all_activities(&self, per_page: u32) -> Result<Vec<Activity>, FetchError> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.list_activities(page, per_page).await?;
            let batch_len = batch.len();
            all.extend(batch);

            if batch_len < per_page as usize {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = all.len(), pages = page, "Fetched all activities");
        Ok(all)
    }
}
