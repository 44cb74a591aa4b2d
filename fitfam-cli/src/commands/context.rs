use anyhow::{Context as _, Result};
use std::path::Path;
use std::sync::Arc;

use fitfam::backend::RestClient;
use fitfam::config::Config;
use fitfam::services::PartnersService;
use fitfam::store::AppState;

/// Everything a command needs: the loaded config and the wired-up stores
pub struct Context {
    pub config: Config,
    pub app: AppState,
}

impl Context {
    /// Load config from `path` (or the default location) and build the client
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(path) => Config::load_from(Path::new(path)),
            None => Config::load(),
        }
        .context("Failed to load configuration")?;

        let client = Arc::new(RestClient::new(&config)?);
        let app = AppState::from_client(client, config.stats.window_days);
        Ok(Self { config, app })
    }

    pub fn client(&self) -> &Arc<RestClient> {
        self.app.auth.client()
    }

    pub fn service(&self) -> &PartnersService {
        self.app.partner_stats.source()
    }

    /// Write the client's session back to the config file when a refresh changed it
    pub async fn persist_session(&mut self) -> Result<()> {
        let session = self.client().session().await;
        if session.access_token == self.config.auth.access_token
            && session.refresh_token == self.config.auth.refresh_token
        {
            return Ok(());
        }

        self.config
            .set_tokens(session.access_token, session.refresh_token);
        self.config.save()?;
        tracing::debug!("Persisted refreshed session tokens");
        Ok(())
    }

    /// Fail early with a hint when no session is stored
    pub fn require_login(&self) -> Result<()> {
        if !self.config.is_authenticated() {
            anyhow::bail!("You are not logged in. Use 'fitfam login' to authenticate.");
        }
        Ok(())
    }
}
