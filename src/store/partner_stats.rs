use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::Result;
use crate::models::PartnerStats;

/// Where the store gets statistics from
pub trait StatsSource: Send + Sync + 'static {
    fn fetch_partner_stats(
        &self,
        partner_id: Uuid,
    ) -> impl Future<Output = Result<PartnerStats>> + Send;
}

/// Fetch state of a single partner id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

#[derive(Debug, Default)]
struct StatsState {
    stats: HashMap<Uuid, Arc<PartnerStats>>,
    status: HashMap<Uuid, LoadStatus>,
    is_loading: bool,
    error: Option<String>,
}

/// In-memory cache of partner statistics keyed by partner id.
///
/// `is_loading` is one flag for all ids: whichever fetch settles first
/// clears it, even while others are still running. `status_of` tracks
/// each id separately and does not have that problem.
pub struct PartnerStatsStore<S> {
    source: S,
    state: RwLock<StatsState>,
}

impl<S: StatsSource> PartnerStatsStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: RwLock::new(StatsState::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and cache statistics for `partner_id`. On failure the cached
    /// entry is left as it was and the message is kept in `error`.
    pub async fn load_partner_stats(&self, partner_id: Uuid) -> Option<Arc<PartnerStats>> {
        self.load_partner_stats_until(partner_id, &CancellationToken::new())
            .await
    }

    /// Like `load_partner_stats`, but gives up when `token` is cancelled.
    /// A cancelled fetch writes nothing and puts the id back to the status
    /// it had before.
    pub async fn load_partner_stats_until(
        &self,
        partner_id: Uuid,
        token: &CancellationToken,
    ) -> Option<Arc<PartnerStats>> {
        let previous = {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error = None;
            state
                .status
                .insert(partner_id, LoadStatus::Loading)
                .unwrap_or_default()
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.source.fetch_partner_stats(partner_id) => Some(result),
        };

        let mut state = self.state.write().await;
        state.is_loading = false;

        match outcome {
            Some(Ok(stats)) => {
                let stats = Arc::new(stats);
                state.stats.insert(partner_id, stats.clone());
                state.status.insert(partner_id, LoadStatus::Loaded);
                tracing::debug!("Loaded stats for partner {}", partner_id);
                Some(stats)
            }
            Some(Err(e)) => {
                tracing::error!("Failed to load partner stats: {}", e);
                state.error = Some(e.to_string());
                state.status.insert(partner_id, LoadStatus::Errored);
                None
            }
            None => {
                tracing::debug!("Stats fetch for partner {} cancelled", partner_id);
                state.status.insert(partner_id, previous);
                None
            }
        }
    }

    /// Drop every cached entry and the last error. The loading flag is left alone.
    pub async fn clear_stats(&self) {
        let mut state = self.state.write().await;
        state.stats.clear();
        state.status.clear();
        state.error = None;
    }

    pub async fn stats_for(&self, partner_id: Uuid) -> Option<Arc<PartnerStats>> {
        self.state.read().await.stats.get(&partner_id).cloned()
    }

    pub async fn snapshot(&self) -> HashMap<Uuid, Arc<PartnerStats>> {
        self.state.read().await.stats.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn status_of(&self, partner_id: Uuid) -> LoadStatus {
        self.state
            .read()
            .await
            .status
            .get(&partner_id)
            .copied()
            .unwrap_or_default()
    }
}
