use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::de::{lenient_f64, lenient_i64};
use super::{User, Workout};

/// Row returned by the `get_partner_stats` procedure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_workouts: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub completed_workouts: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_weight: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub completion_rate: f64,
}

/// Cached statistics for one user, replaced wholesale on every fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerStats {
    pub user_id: Uuid,
    pub name: String,
    pub username: String,
    pub total_workouts: i64,
    pub completed_workouts: i64,
    pub total_weight: f64,
    /// Percentage as reported by the backend
    pub completion_rate: f64,
    pub streak: u32,
    /// Trailing window, most recent first
    pub workouts: Vec<Workout>,
    pub fetched_at: DateTime<Utc>,
}

impl PartnerStats {
    pub fn new(user: &User, row: StatsRow, workouts: Vec<Workout>, streak: u32) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            total_workouts: row.total_workouts,
            completed_workouts: row.completed_workouts,
            total_weight: row.total_weight,
            completion_rate: row.completion_rate,
            streak,
            workouts,
            fetched_at: Utc::now(),
        }
    }
}

/// Partner statistics together with the favorite flag of the partnership
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerProfile {
    pub stats: PartnerStats,
    pub is_favorite: bool,
}
