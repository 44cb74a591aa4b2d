use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::de::{flexible_datetime, null_as_false};
use super::User;
use crate::error::FitFamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnershipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl PartnershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartnershipStatus::Pending => "pending",
            PartnershipStatus::Accepted => "accepted",
            PartnershipStatus::Rejected => "rejected",
        }
    }

    /// Pending and accepted rows block a new invite between the same pair
    pub fn is_active(&self) -> bool {
        matches!(self, PartnershipStatus::Pending | PartnershipStatus::Accepted)
    }
}

impl std::fmt::Display for PartnershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PartnershipStatus {
    type Err = FitFamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PartnershipStatus::Pending),
            "accepted" => Ok(PartnershipStatus::Accepted),
            "rejected" => Ok(PartnershipStatus::Rejected),
            _ => Err(FitFamError::BadRequest(format!("Invalid partnership status: {}", s))),
        }
    }
}

/// Answer to a received invite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteResponse {
    Accepted,
    Rejected,
}

impl From<InviteResponse> for PartnershipStatus {
    fn from(response: InviteResponse) -> Self {
        match response {
            InviteResponse::Accepted => PartnershipStatus::Accepted,
            InviteResponse::Rejected => PartnershipStatus::Rejected,
        }
    }
}

/// Plain `workout_partners` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnershipRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub partner_id: Uuid,
    pub status: PartnershipStatus,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_favorite: bool,
    #[serde(deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct NewPartnership {
    pub user_id: Uuid,
    pub partner_id: Uuid,
    pub status: PartnershipStatus,
}

/// Partnership with both sides embedded through their foreign keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partnership {
    pub id: Uuid,
    pub status: PartnershipStatus,
    #[serde(deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_favorite: bool,
    #[serde(default)]
    pub partner: Option<User>,
    #[serde(default)]
    pub user: Option<User>,
}

/// How a partnership reads from one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
    Accepted,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Sent => write!(f, "sent"),
            Direction::Received => write!(f, "received"),
            Direction::Accepted => write!(f, "accepted"),
        }
    }
}

impl Partnership {
    /// The other side of the relationship, seen from `me`
    pub fn counterpart(&self, me: Uuid) -> Option<&User> {
        match (&self.user, &self.partner) {
            (Some(user), partner) if user.id == me => partner.as_ref(),
            (user, Some(partner)) if partner.id == me => user.as_ref(),
            _ => None,
        }
    }

    pub fn direction_for(&self, me: Uuid) -> Option<Direction> {
        if self.status == PartnershipStatus::Accepted {
            return Some(Direction::Accepted);
        }
        if self.user.as_ref().is_some_and(|u| u.id == me) {
            Some(Direction::Sent)
        } else if self.partner.as_ref().is_some_and(|p| p.id == me) {
            Some(Direction::Received)
        } else {
            None
        }
    }
}

/// Partnerships of one user, split by who sent the invite
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartnerLists {
    pub sent: Vec<Partnership>,
    pub received: Vec<Partnership>,
}

impl PartnerLists {
    /// Rows where `me` is the requester go to `sent`, rows where `me` is the
    /// recipient go to `received`. Ordering of `rows` is kept.
    pub fn split(rows: Vec<Partnership>, me: Uuid) -> Self {
        let mut lists = PartnerLists::default();
        for row in rows {
            if row.user.as_ref().is_some_and(|u| u.id == me) {
                lists.sent.push(row);
            } else if row.partner.as_ref().is_some_and(|p| p.id == me) {
                lists.received.push(row);
            }
        }
        lists
    }

    /// Accepted partnerships from both lists
    pub fn accepted(&self) -> impl Iterator<Item = &Partnership> {
        self.sent
            .iter()
            .chain(self.received.iter())
            .filter(|p| p.status == PartnershipStatus::Accepted)
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty() && self.received.is_empty()
    }
}
