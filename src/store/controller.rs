use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use super::partner_stats::{PartnerStatsStore, StatsSource};
use crate::models::{PartnerLists, PartnershipStatus};

/// Loads partner statistics for the partners a view is showing.
///
/// A fetch starts when an id is observed as accepted after having been
/// observed with any other status (or not at all). Observing the same
/// accepted id again does nothing. Dropping the controller or calling
/// `cancel` stops outstanding fetches before they touch the store.
pub struct FetchController<S: StatsSource> {
    store: Arc<PartnerStatsStore<S>>,
    last_seen: HashMap<Uuid, PartnershipStatus>,
    token: CancellationToken,
    tracker: TaskTracker,
}

impl<S: StatsSource> FetchController<S> {
    pub fn new(store: Arc<PartnerStatsStore<S>>) -> Self {
        Self {
            store,
            last_seen: HashMap::new(),
            token: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }

    /// Record the status a partner is shown with; returns true when this
    /// started a fetch. Must be called inside a tokio runtime.
    pub fn observe(&mut self, partner_id: Uuid, status: PartnershipStatus) -> bool {
        let previous = self.last_seen.insert(partner_id, status);
        if status != PartnershipStatus::Accepted
            || previous == Some(PartnershipStatus::Accepted)
            || self.token.is_cancelled()
        {
            return false;
        }

        let store = self.store.clone();
        let token = self.token.child_token();
        self.tracker.spawn(async move {
            store.load_partner_stats_until(partner_id, &token).await;
        });

        tracing::debug!("Started stats fetch for partner {}", partner_id);
        true
    }

    /// Observe the counterpart of every partnership in `lists`
    pub fn observe_lists(&mut self, lists: &PartnerLists, me: Uuid) -> usize {
        let mut started = 0;
        for partnership in lists.sent.iter().chain(lists.received.iter()) {
            if let Some(partner) = partnership.counterpart(me) {
                if self.observe(partner.id, partnership.status) {
                    started += 1;
                }
            }
        }
        started
    }

    /// Number of fetches still running
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every started fetch has finished
    pub async fn join(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Stop all outstanding fetches; later observations start nothing
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl<S: StatsSource> Drop for FetchController<S> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
