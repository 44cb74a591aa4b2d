use colored::Colorize;

use fitfam::comparison::{Comparison, Leader, MetricRow, WEEKDAY_LABELS};

pub const NO_WORKOUTS: &str = "No workout data available for this week";

fn format_value(value: f64, is_percentage: bool) -> String {
    if is_percentage {
        format!("{:.0}%", value)
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn render_row(row: &MetricRow) -> String {
    let you = format_value(row.you, row.is_percentage);
    let partner = format_value(row.partner, row.is_percentage);
    let (you, partner) = match row.leader() {
        Leader::You => (you.green().bold().to_string(), partner),
        Leader::Partner => (you, partner.green().bold().to_string()),
        Leader::Tie => (you, partner),
    };
    format!("{:<20} {:>10} {:>10}", row.label, you, partner)
}

fn render_slots(slots: &[u8; 7]) -> String {
    slots
        .iter()
        .map(|slot| {
            if *slot > 0 {
                format!("{:>4}", "●".green())
            } else {
                format!("{:>4}", "·".dimmed())
            }
        })
        .collect()
}

/// Side-by-side view of the caller and one partner
pub fn render_comparison(comparison: &Comparison) -> String {
    let mut lines = vec![format!(
        "{} vs {}  {}",
        "You".bold(),
        comparison.partner_name.bold(),
        format!("@{}", comparison.partner_username).dimmed()
    )];
    lines.push("────────────────────────────────────────────".to_string());

    if !comparison.has_workouts() {
        lines.push(NO_WORKOUTS.dimmed().to_string());
        return lines.join("\n");
    }

    lines.push(format!("{:<20} {:>10} {:>10}", "", "You", "Partner"));
    lines.extend(comparison.rows.iter().map(render_row));

    lines.push(String::new());
    lines.push(format!(
        "{:<9}{}",
        "",
        WEEKDAY_LABELS
            .iter()
            .map(|day| format!("{:>4}", day))
            .collect::<String>()
    ));
    lines.push(format!("{:<9}{}", "You", render_slots(&comparison.weekly.you)));
    lines.push(format!(
        "{:<9}{}",
        "Partner",
        render_slots(&comparison.weekly.partner)
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitfam::comparison::WeeklyGrid;

    fn comparison(partner_total: f64) -> Comparison {
        Comparison {
            partner_name: "Riley".to_string(),
            partner_username: "riley".to_string(),
            rows: vec![
                MetricRow {
                    label: "Weekly Workouts",
                    you: 2.0,
                    partner: partner_total,
                    is_percentage: false,
                },
                MetricRow {
                    label: "Completion Rate",
                    you: 66.666,
                    partner: 100.0,
                    is_percentage: true,
                },
            ],
            weekly: WeeklyGrid {
                you: [0, 100, 0, 0, 0, 0, 0],
                partner: [100, 0, 0, 0, 0, 0, 0],
            },
        }
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(4.0, false), "4");
        assert_eq!(format_value(1250.5, false), "1250.5");
        assert_eq!(format_value(66.666, true), "67%");
    }

    #[test]
    fn test_render_comparison_rows_and_grid() {
        colored::control::set_override(false);
        let text = render_comparison(&comparison(3.0));

        assert!(text.starts_with("You vs Riley  @riley"));
        assert!(text.contains("Weekly Workouts"));
        assert!(text.contains("67%"));
        assert!(text.contains(" Sun Mon Tue"));
        assert!(!text.contains(NO_WORKOUTS));
    }

    #[test]
    fn test_render_without_partner_workouts_shows_fallback() {
        colored::control::set_override(false);
        let mut empty = comparison(0.0);
        empty.weekly = WeeklyGrid::default();
        for row in &mut empty.rows {
            row.partner = 0.0;
        }

        let text = render_comparison(&empty);
        assert!(text.contains(NO_WORKOUTS));
        assert!(!text.contains("Weekly Workouts"));
    }
}
