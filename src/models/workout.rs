use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::de::{flexible_datetime, null_as_false};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// A `daily_workouts` row with its exercises and sets embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    #[serde(deserialize_with = "flexible_datetime")]
    pub date: DateTime<Utc>,
    /// Minutes
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub completed: bool,
    #[serde(default, rename = "workout_exercises")]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub target_sets: Option<i32>,
    #[serde(default)]
    pub target_reps: Option<i32>,
    #[serde(default, rename = "exercise_sets")]
    pub sets: Vec<ExerciseSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub id: Uuid,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: Option<i32>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub completed: bool,
}

impl ExerciseSet {
    /// A set counts as done once both weight and reps are entered
    pub fn is_logged(&self) -> bool {
        self.weight.is_some() && self.reps.is_some()
    }
}

impl Workout {
    /// Calendar day of the workout (UTC)
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Weekday slot with Sunday as 0
    pub fn weekday_index(&self) -> usize {
        self.date.weekday().num_days_from_sunday() as usize
    }

    pub fn sets(&self) -> impl Iterator<Item = &ExerciseSet> {
        self.exercises.iter().flat_map(|e| e.sets.iter())
    }
}
