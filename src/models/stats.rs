//! Kudos aggregates for the dashboard.
//!
//! Computed on demand from one fetch of the athlete's activities; nothing
//! is persisted between request cycles.

use serde::Serialize;

use crate::models::Activity;

/// Kudos statistics across all fetched activities.
#[derive(Debug, Clone, Serialize)]
pub struct KudosStats {
    /// Total activities fetched
    pub total_activities: u32,
    /// Total kudos across all activities
    pub total_kudos: u32,
    /// Average kudos per activity (1 decimal)
    pub average_kudos: f64,
    /// Total distance across all activities (km, 2 decimals)
    pub total_distance_km: f64,
    /// Total moving time across all activities (minutes, 1 decimal)
    pub total_time_min: f64,
    /// Kudos earned per kilometer (None when no distance)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kudos_per_km: Option<f64>,
    /// Minutes of moving time per kudo (None when no kudos)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_per_kudos: Option<f64>,
    /// The activity with the most kudos (None when no activities)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_loved: Option<MostLovedActivity>,
}

/// The single most-kudoed activity.
#[derive(Debug, Clone, Serialize)]
pub struct MostLovedActivity {
    pub name: String,
    pub kudos: u32,
    pub distance_km: f64,
}

impl KudosStats {
    /// Compute aggregates from a batch of activities.
    ///
    /// An empty batch yields zeroed stats rather than a division error.
    pub fn from_activities(activities: &[Activity]) -> Self {
        let total_activities = activities.len() as u32;
        let total_kudos: u32 = activities.iter().map(|a| a.kudos_count).sum();
        let total_distance_m: f64 = activities.iter().map(|a| a.distance).sum();
        let total_moving_secs: u64 = activities.iter().map(|a| a.moving_time).sum();

        let total_distance_km = round2(total_distance_m / 1000.0);
        let total_time_min = round1(total_moving_secs as f64 / 60.0);

        let average_kudos = if total_activities > 0 {
            round1(f64::from(total_kudos) / f64::from(total_activities))
        } else {
            0.0
        };

        let kudos_per_km = (total_distance_km > 0.0)
            .then(|| round2(f64::from(total_kudos) / total_distance_km));
        let min_per_kudos =
            (total_kudos > 0).then(|| round2(total_time_min / f64::from(total_kudos)));

        let most_loved = activities
            .iter()
            .max_by_key(|a| a.kudos_count)
            .map(|a| MostLovedActivity {
                name: a.name.clone(),
                kudos: a.kudos_count,
                distance_km: round2(a.distance / 1000.0),
            });

        Self {
            total_activities,
            total_kudos,
            average_kudos,
            total_distance_km,
            total_time_min,
            kudos_per_km,
            min_per_kudos,
            most_loved,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
