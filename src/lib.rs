// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Kudos-Dashboard: a personal Strava kudos dashboard backend
//!
//! This crate authenticates against Strava via the OAuth2 refresh-token
//! flow, fetches the athlete's activities, and serves them (plus kudos
//! aggregates) as JSON to a frontend.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::StravaService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub strava: StravaService,
}
