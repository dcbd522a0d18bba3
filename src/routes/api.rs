// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes serving activity data to the dashboard frontend.

use crate::error::Result;
use crate::models::{Activity, KudosStats};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Strava caps per_page at 200.
const MAX_PER_PAGE: u32 = 200;

/// Page size used when paging through everything for stats.
const STATS_PER_PAGE: u32 = 100;

/// Dashboard API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(get_activities))
        .route("/api/stats", get(get_kudos_stats))
}

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Pagination: page number (1-indexed)
    #[serde(default = "default_page")]
    page: u32,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    30
}

/// Get one page of the athlete's activities, most recent first.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActivitiesQuery>,
) -> Result<Json<Vec<Activity>>> {
    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, MAX_PER_PAGE);

    let activities = state.strava.list_activities(page, per_page).await?;

    Ok(Json(activities))
}

/// Get kudos aggregates across all of the athlete's activities.
async fn get_kudos_stats(State(state): State<Arc<AppState>>) -> Result<Json<KudosStats>> {
    let activities = state.strava.list_all_activities(STATS_PER_PAGE).await?;

    Ok(Json(KudosStats::from_activities(&activities)))
}
