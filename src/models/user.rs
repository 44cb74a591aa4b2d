use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row of the `users` table as selected for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// `@handle` form used on cards
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}

/// Identity attached to a backend session (`/auth/v1/user`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}
