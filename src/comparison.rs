use serde::Serialize;

use crate::models::{PartnerStats, Workout};

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Leader {
    You,
    Partner,
    Tie,
}

/// One line of the side-by-side comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub label: &'static str,
    pub you: f64,
    pub partner: f64,
    pub is_percentage: bool,
}

impl MetricRow {
    fn new(label: &'static str, you: f64, partner: f64) -> Self {
        Self {
            label,
            you,
            partner,
            is_percentage: false,
        }
    }

    fn percentage(mut self) -> Self {
        self.is_percentage = true;
        self
    }

    pub fn leader(&self) -> Leader {
        if self.you > self.partner {
            Leader::You
        } else if self.partner > self.you {
            Leader::Partner
        } else {
            Leader::Tie
        }
    }
}

/// Seven weekday slots, Sunday first: 100 where a completed workout fell on that day
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyGrid {
    pub you: [u8; 7],
    pub partner: [u8; 7],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub partner_name: String,
    pub partner_username: String,
    pub rows: Vec<MetricRow>,
    pub weekly: WeeklyGrid,
}

impl Comparison {
    /// Compare the caller's statistics (zeros when unavailable) with a partner's
    pub fn build(you: Option<&PartnerStats>, partner: &PartnerStats) -> Self {
        let mine = |f: fn(&PartnerStats) -> f64| you.map(f).unwrap_or(0.0);

        let rows = vec![
            MetricRow::new(
                "Weekly Workouts",
                mine(|s| s.total_workouts as f64),
                partner.total_workouts as f64,
            ),
            MetricRow::new(
                "Total Weight (lbs)",
                mine(|s| s.total_weight),
                partner.total_weight,
            ),
            MetricRow::new(
                "Completion Rate",
                mine(|s| s.completion_rate),
                partner.completion_rate,
            )
            .percentage(),
            MetricRow::new(
                "Current Streak",
                mine(|s| s.streak as f64),
                partner.streak as f64,
            ),
        ];

        Self {
            partner_name: partner.name.clone(),
            partner_username: partner.username.clone(),
            rows,
            weekly: WeeklyGrid {
                you: you
                    .map(|s| weekly_completion(&s.workouts))
                    .unwrap_or_default(),
                partner: weekly_completion(&partner.workouts),
            },
        }
    }

    pub fn has_workouts(&self) -> bool {
        self.weekly.partner.iter().any(|slot| *slot > 0)
            || self.rows.iter().any(|row| row.partner > 0.0)
    }
}

pub fn weekly_completion(workouts: &[Workout]) -> [u8; 7] {
    let mut slots = [0u8; 7];
    for workout in workouts.iter().filter(|w| w.completed) {
        slots[workout.weekday_index()] = 100;
    }
    slots
}
