// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity model, typed at the API boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded exercise session from the Strava activities endpoint.
///
/// Fields map 1:1 from Strava's summary representation; unknown upstream
/// fields are ignored. Read-only for the lifetime of one request cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Sport type (Ride, Run, Hike, etc.)
    pub sport_type: String,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: u64,
    /// Elapsed time in seconds
    pub elapsed_time: u64,
    /// Start date/time (UTC)
    pub start_date: DateTime<Utc>,
    /// Average speed in meters per second
    #[serde(default)]
    pub average_speed: f64,
    /// Kudos received
    #[serde(default)]
    pub kudos_count: u32,
    /// Total elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: f64,
}
