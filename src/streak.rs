use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::Workout;

/// Count consecutive calendar days with at least one completed workout,
/// scanning back from the most recent day that has any workout.
///
/// A day whose workouts are all incomplete ends the streak, as does a
/// calendar day with no workouts at all.
pub fn calculate_streak(workouts: &[Workout]) -> u32 {
    let mut days: BTreeMap<NaiveDate, bool> = BTreeMap::new();
    for workout in workouts {
        *days.entry(workout.day()).or_insert(false) |= workout.completed;
    }

    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;

    for (day, completed) in days.iter().rev() {
        if let Some(expected) = expected {
            if *day != expected {
                break;
            }
        }
        if !completed {
            break;
        }
        streak += 1;
        expected = day.pred_opt();
        if expected.is_none() {
            break;
        }
    }

    streak
}
