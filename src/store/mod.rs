//! Application state holders. An `AppState` is built once at start-up and
//! handed to whatever renders views; nothing here is a global.

use std::sync::Arc;

use crate::backend::RestClient;
use crate::error::Result;
use crate::services::PartnersService;

pub mod auth;
pub mod controller;
pub mod partner_stats;

pub use auth::{AuthState, AuthStore};
pub use controller::FetchController;
pub use partner_stats::{LoadStatus, PartnerStatsStore, StatsSource};

pub struct AppState<S: StatsSource = PartnersService> {
    pub auth: Arc<AuthStore>,
    pub partner_stats: Arc<PartnerStatsStore<S>>,
}

impl AppState<PartnersService> {
    /// Wire both stores to one backend client
    pub fn from_client(client: Arc<RestClient>, window_days: i64) -> Self {
        let service = PartnersService::new(client.clone()).with_window_days(window_days);
        Self::new(
            Arc::new(AuthStore::new(client)),
            Arc::new(PartnerStatsStore::new(service)),
        )
    }
}

impl<S: StatsSource> AppState<S> {
    pub fn new(auth: Arc<AuthStore>, partner_stats: Arc<PartnerStatsStore<S>>) -> Self {
        Self {
            auth,
            partner_stats,
        }
    }

    /// Restore the session, if any
    pub async fn initialize(&self) -> Result<()> {
        self.auth.init_auth().await
    }

    /// Sign out and drop every cached partner statistic
    pub async fn sign_out(&self) -> Result<()> {
        let result = self.auth.logout().await;
        self.partner_stats.clear_stats().await;
        result
    }

    /// Controller for a view that shows partners
    pub fn fetch_controller(&self) -> FetchController<S> {
        FetchController::new(self.partner_stats.clone())
    }
}
