use chrono::{DateTime, Utc};
use colored::Colorize;
use uuid::Uuid;

use fitfam::models::{
    Direction, PartnerProfile, PartnerStats, Partnership, PartnershipStatus, User,
};
use fitfam::routes::partner_route;

pub const STATS_FALLBACK: &str = "Partner Stats Coming Soon!";

/// Everything a partner card shows
pub struct CardView<'a> {
    pub invite_id: Uuid,
    pub partner: &'a User,
    pub status: PartnershipStatus,
    pub direction: Direction,
    pub joined: DateTime<Utc>,
    pub stats: Option<&'a PartnerStats>,
}

impl<'a> CardView<'a> {
    /// Card for `partnership` as seen by `me`; `None` when `me` is on neither side
    pub fn for_partnership(partnership: &'a Partnership, me: Uuid) -> Option<Self> {
        Some(Self {
            invite_id: partnership.id,
            partner: partnership.counterpart(me)?,
            status: partnership.status,
            direction: partnership.direction_for(me)?,
            joined: partnership.created_at,
            stats: None,
        })
    }

    pub fn with_stats(mut self, stats: Option<&'a PartnerStats>) -> Self {
        self.stats = stats;
        self
    }
}

/// Status text next to the handle
pub fn status_label(status: PartnershipStatus, direction: Direction) -> String {
    match direction {
        Direction::Accepted => String::new(),
        Direction::Sent => format!("Invite {}", status),
        Direction::Received => {
            let text = status.as_str();
            let mut chars = text.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn colored_status(status: PartnershipStatus, label: String) -> String {
    match status {
        PartnershipStatus::Pending => label.yellow().to_string(),
        PartnershipStatus::Accepted => label.green().to_string(),
        PartnershipStatus::Rejected => label.red().to_string(),
    }
}

pub fn render_card(view: &CardView<'_>) -> String {
    let mut lines = Vec::new();

    let label = status_label(view.status, view.direction);
    let mut header = format!(
        "{}  {}",
        view.partner.name.bold(),
        view.partner.handle().dimmed()
    );
    if !label.is_empty() {
        header.push_str("  ");
        header.push_str(&colored_status(view.status, label));
    }
    lines.push(header);

    match view.stats {
        Some(stats) => lines.push(format!(
            "  {} workouts this week, {} completed, {}-day streak",
            stats.total_workouts, stats.completed_workouts, stats.streak
        )),
        None => lines.push(format!("  {}", STATS_FALLBACK.dimmed())),
    }
    lines.push(format!("  Joined {}", view.joined.format("%b %-d, %Y")));

    match (view.status, view.direction) {
        (PartnershipStatus::Pending, Direction::Received) => lines.push(format!(
            "  {} fitfam partners accept {}   {} fitfam partners decline {}",
            "Accept:".green(),
            view.invite_id,
            "Decline:".red(),
            view.invite_id
        )),
        (PartnershipStatus::Pending, Direction::Sent) => lines.push(format!(
            "  {} fitfam partners cancel {}",
            "Cancel Invite:".red(),
            view.invite_id
        )),
        (PartnershipStatus::Accepted, _) => lines.push(format!(
            "  {} {}",
            "Compare:".cyan(),
            partner_route(view.partner.id)
        )),
        _ => {}
    }

    lines.join("\n")
}

/// Favorite marker shown next to a partner's name
pub fn favorite_label(is_favorite: bool) -> String {
    if is_favorite {
        format!("{} Favorited", "★".yellow())
    } else {
        "☆ Not a favorite".dimmed().to_string()
    }
}

/// Detail view of one partner
pub fn render_profile(profile: &PartnerProfile) -> String {
    let stats = &profile.stats;
    [
        format!(
            "{}  {}  {}",
            stats.name.bold(),
            format!("@{}", stats.username).dimmed(),
            favorite_label(profile.is_favorite)
        ),
        format!(
            "  {} workouts, {} completed ({:.0}%)",
            stats.total_workouts, stats.completed_workouts, stats.completion_rate
        ),
        format!("  {:.1} lbs lifted, {}-day streak", stats.total_weight, stats.streak),
        format!("  {} {}", "Compare:".cyan(), partner_route(stats.user_id)),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn partnership(from: &User, to: &User, status: PartnershipStatus) -> Partnership {
        Partnership {
            id: Uuid::new_v4(),
            status,
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
            is_favorite: false,
            partner: Some(to.clone()),
            user: Some(from.clone()),
        }
    }

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            username: name.to_lowercase(),
            email: None,
        }
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(
            status_label(PartnershipStatus::Pending, Direction::Sent),
            "Invite pending"
        );
        assert_eq!(
            status_label(PartnershipStatus::Rejected, Direction::Received),
            "Rejected"
        );
        assert_eq!(
            status_label(PartnershipStatus::Accepted, Direction::Accepted),
            ""
        );
    }

    #[test]
    fn test_received_pending_card_offers_accept_and_decline() {
        colored::control::set_override(false);
        let (alex, bea) = (user("Alex"), user("Bea"));
        let row = partnership(&alex, &bea, PartnershipStatus::Pending);

        let card = render_card(&CardView::for_partnership(&row, bea.id).unwrap());
        assert!(card.contains("Alex  @alex  Pending"));
        assert!(card.contains(STATS_FALLBACK));
        assert!(card.contains("Joined Mar 9, 2024"));
        assert!(card.contains(&format!("fitfam partners accept {}", row.id)));
        assert!(card.contains(&format!("fitfam partners decline {}", row.id)));
        assert!(!card.contains("Cancel Invite"));
    }

    #[test]
    fn test_sent_pending_card_offers_cancel() {
        colored::control::set_override(false);
        let (alex, bea) = (user("Alex"), user("Bea"));
        let row = partnership(&alex, &bea, PartnershipStatus::Pending);

        let card = render_card(&CardView::for_partnership(&row, alex.id).unwrap());
        assert!(card.contains("Bea  @bea  Invite pending"));
        assert!(card.contains(&format!("fitfam partners cancel {}", row.id)));
        assert!(!card.contains("Decline"));
    }

    #[test]
    fn test_profile_shows_favorite_state() {
        colored::control::set_override(false);
        let riley = user("Riley");
        let stats = PartnerStats::new(
            &riley,
            fitfam::models::StatsRow {
                total_workouts: 4,
                completed_workouts: 3,
                total_weight: 5200.0,
                completion_rate: 75.0,
            },
            Vec::new(),
            2,
        );

        let mut profile = PartnerProfile {
            stats,
            is_favorite: true,
        };
        let text = render_profile(&profile);
        assert!(text.starts_with("Riley  @riley  ★ Favorited"));
        assert!(text.contains("4 workouts, 3 completed (75%)"));
        assert!(text.contains("2-day streak"));
        assert!(text.contains(&format!("/partners/{}", riley.id)));

        profile.is_favorite = false;
        assert!(render_profile(&profile).contains("Not a favorite"));
    }

    #[test]
    fn test_accepted_card_links_to_comparison() {
        colored::control::set_override(false);
        let (alex, bea) = (user("Alex"), user("Bea"));
        let row = partnership(&alex, &bea, PartnershipStatus::Accepted);

        let card = render_card(&CardView::for_partnership(&row, alex.id).unwrap());
        assert!(card.contains(&format!("/partners/{}", bea.id)));
        assert!(card.starts_with("Bea  @bea\n"));
    }
}
