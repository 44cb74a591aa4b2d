use chrono::{Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::{contains_pattern, Query, RestClient};
use crate::error::{FitFamError, Result};
use crate::models::{
    InviteResponse, NewPartnership, PartnerLists, PartnerProfile, PartnerStats, Partnership,
    PartnershipRow, PartnershipStatus, StatsRow, User, Workout,
};
use crate::store::StatsSource;
use crate::streak::calculate_streak;

const USERS: &str = "users";
const WORKOUT_PARTNERS: &str = "workout_partners";
const DAILY_WORKOUTS: &str = "daily_workouts";
const PARTNER_STATS_RPC: &str = "get_partner_stats";

const SEARCH_LIMIT: usize = 10;

const PARTNERSHIP_COLUMNS: &str = "
    id,
    status,
    created_at,
    is_favorite,
    partner:users!workout_partners_partner_id_fkey (id, name, username),
    user:users!workout_partners_user_id_fkey (id, name, username)
";

const WORKOUT_COLUMNS: &str = "
    id, title, date, duration, difficulty, completed,
    workout_exercises (
        id, name, target_sets, target_reps,
        exercise_sets (id, weight, reps, completed)
    )
";

#[derive(Debug, Deserialize)]
struct PartnershipEnds {
    user_id: Uuid,
    partner_id: Uuid,
    status: PartnershipStatus,
}

#[derive(Debug, Deserialize)]
struct FavoriteFlag {
    #[serde(default)]
    is_favorite: Option<bool>,
}

#[derive(Debug, Serialize)]
struct StatusPatch {
    status: PartnershipStatus,
}

#[derive(Debug, Serialize)]
struct FavoritePatch {
    is_favorite: bool,
}

/// The procedure returns a set of rows; a scalar composite is accepted too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatsReply {
    Rows(Vec<StatsRow>),
    Row(StatsRow),
}

impl StatsReply {
    fn into_row(self) -> StatsRow {
        match self {
            StatsReply::Rows(rows) => rows.into_iter().next().unwrap_or_default(),
            StatsReply::Row(row) => row,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatsArgs {
    partner_id: Uuid,
}

/// Partner operations against the hosted backend. Each call resolves the
/// signed-in user first and fails with `NotAuthenticated` when there is none.
#[derive(Clone)]
pub struct PartnersService {
    client: Arc<RestClient>,
    window_days: i64,
}

impl PartnersService {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self {
            client,
            window_days: 7,
        }
    }

    /// Length of the trailing workout window loaded with statistics
    pub fn with_window_days(mut self, days: i64) -> Self {
        self.window_days = days.max(1);
        self
    }

    pub fn client(&self) -> &Arc<RestClient> {
        &self.client
    }

    async fn current_user_id(&self) -> Result<Uuid> {
        Ok(self.client.require_user().await?.id)
    }

    /// Users whose username or email contains `query`, minus the caller and
    /// anyone already in a pending or accepted partnership with the caller
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>> {
        let me = self.current_user_id().await?;
        let pattern = contains_pattern(query);

        let users_query = Query::new(USERS)
            .select("id, name, username")
            .or([
                format!("username.ilike.{}", pattern),
                format!("email.ilike.{}", pattern),
            ])
            .neq("id", me)
            .limit(SEARCH_LIMIT);

        let candidates: Vec<User> = match self.client.select(&users_query).await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!("Search error: {}", e);
                return Err(FitFamError::Backend("Failed to search users".to_string()));
            }
        };

        let existing = self.active_partner_ids(me).await?;
        let results: Vec<User> = candidates
            .into_iter()
            .filter(|u| !existing.contains(&u.id))
            .collect();

        tracing::debug!("Search for {:?} returned {} users", query, results.len());
        Ok(results)
    }

    /// Ids on either side of the caller's pending or accepted partnerships
    async fn active_partner_ids(&self, me: Uuid) -> Result<HashSet<Uuid>> {
        let query = Query::new(WORKOUT_PARTNERS)
            .select("user_id, partner_id, status")
            .or([format!("user_id.eq.{}", me), format!("partner_id.eq.{}", me)])
            .in_list(
                "status",
                [PartnershipStatus::Pending, PartnershipStatus::Accepted],
            );

        let rows: Vec<PartnershipEnds> = self.client.select(&query).await?;
        Ok(rows
            .into_iter()
            .filter(|row| row.status.is_active())
            .flat_map(|row| [row.user_id, row.partner_id])
            .collect())
    }

    /// Create a pending partnership from the caller to `partner_id`
    pub async fn send_partner_invite(&self, partner_id: Uuid) -> Result<PartnershipRow> {
        let me = self.current_user_id().await?;
        if me == partner_id {
            return Err(FitFamError::BadRequest(
                "Cannot send a partner invite to yourself".to_string(),
            ));
        }

        let row: PartnershipRow = self
            .client
            .insert(
                WORKOUT_PARTNERS,
                &NewPartnership {
                    user_id: me,
                    partner_id,
                    status: PartnershipStatus::Pending,
                },
            )
            .await?;

        tracing::info!("Sent partner invite {} to {}", row.id, partner_id);
        Ok(row)
    }

    /// The caller's partnerships, newest first, split into sent and received.
    /// A failed lookup is logged and reads as no partnerships.
    pub async fn get_partners(&self) -> Result<PartnerLists> {
        let me = self.current_user_id().await?;

        let query = Query::new(WORKOUT_PARTNERS)
            .select(PARTNERSHIP_COLUMNS)
            .or([format!("user_id.eq.{}", me), format!("partner_id.eq.{}", me)])
            .order("created_at", false);

        match self.client.select::<Partnership>(&query).await {
            Ok(rows) => Ok(PartnerLists::split(rows, me)),
            Err(e) => {
                tracing::error!("Error fetching partnerships: {}", e);
                Ok(PartnerLists::default())
            }
        }
    }

    /// Accept or reject a received invite
    pub async fn respond_to_invite(&self, invite_id: Uuid, response: InviteResponse) -> Result<()> {
        self.current_user_id().await?;

        let status = PartnershipStatus::from(response);
        self.client
            .update(
                &Query::new(WORKOUT_PARTNERS).eq("id", invite_id),
                &StatusPatch { status },
            )
            .await?;

        tracing::info!("Invite {} marked {}", invite_id, status);
        Ok(())
    }

    /// Withdraw an invite
    pub async fn cancel_invite(&self, invite_id: Uuid) -> Result<()> {
        self.current_user_id().await?;

        self.client
            .delete(&Query::new(WORKOUT_PARTNERS).eq("id", invite_id))
            .await?;

        tracing::info!("Cancelled invite {}", invite_id);
        Ok(())
    }

    /// Statistics of a partner plus whether the caller marked them favorite
    pub async fn get_partner_stats(&self, partner_id: Uuid) -> Result<PartnerProfile> {
        let me = self.current_user_id().await?;

        let result: Result<PartnerProfile> = async {
            let stats = self.stats_for(partner_id).await?;
            let is_favorite = self.favorite_flag(me, partner_id).await;
            Ok(PartnerProfile { stats, is_favorite })
        }
        .await;

        if let Err(e) = &result {
            tracing::error!("Error in get_partner_stats: {}", e);
        }
        result
    }

    /// The caller's own statistics over the same window
    pub async fn get_own_stats(&self) -> Result<PartnerStats> {
        let me = self.current_user_id().await?;
        self.stats_for(me).await
    }

    /// Mark or unmark an accepted partner as favorite. Only the caller's own
    /// accepted row for that partner is touched.
    pub async fn toggle_favorite_partner(&self, partner_id: Uuid, is_favorite: bool) -> Result<()> {
        let me = self.current_user_id().await?;

        let query = Query::new(WORKOUT_PARTNERS)
            .eq("user_id", me)
            .eq("partner_id", partner_id)
            .eq("status", PartnershipStatus::Accepted);

        self.client
            .update(&query, &FavoritePatch { is_favorite })
            .await?;

        tracing::info!("Partner {} favorite set to {}", partner_id, is_favorite);
        Ok(())
    }

    /// Whether the caller marked the accepted partner `partner_id` as favorite
    pub async fn is_favorite_partner(&self, partner_id: Uuid) -> Result<bool> {
        let me = self.current_user_id().await?;
        Ok(self.favorite_flag(me, partner_id).await)
    }

    /// Lookup failures read as false
    async fn favorite_flag(&self, me: Uuid, partner_id: Uuid) -> bool {
        let query = Query::new(WORKOUT_PARTNERS)
            .select("is_favorite")
            .eq("user_id", me)
            .eq("partner_id", partner_id)
            .eq("status", PartnershipStatus::Accepted)
            .limit(1);

        match self.client.select::<FavoriteFlag>(&query).await {
            Ok(rows) => rows
                .first()
                .and_then(|row| row.is_favorite)
                .unwrap_or(false),
            Err(e) => {
                tracing::warn!("Error reading favorite flag for {}: {}", partner_id, e);
                false
            }
        }
    }

    /// Identity, aggregate counters and trailing workouts of one user
    async fn stats_for(&self, user_id: Uuid) -> Result<PartnerStats> {
        let user: User = self
            .client
            .select_single(&Query::new(USERS).select("id, name, username").eq("id", user_id))
            .await
            .map_err(|e| match e {
                FitFamError::NotFound(_) => FitFamError::NotFound("Partner not found".to_string()),
                other => other,
            })?;

        let reply: StatsReply = self
            .client
            .rpc(PARTNER_STATS_RPC, &StatsArgs { partner_id: user_id })
            .await?;
        let row = reply.into_row();

        let since = Utc::now() - Duration::days(self.window_days);
        // Counters stand on their own; missing workouts only empty the grid
        let workouts: Vec<Workout> = self
            .client
            .select(
                &Query::new(DAILY_WORKOUTS)
                    .select(WORKOUT_COLUMNS)
                    .eq("user_id", user_id)
                    .gte("date", since.to_rfc3339_opts(SecondsFormat::Millis, true))
                    .order("date", false),
            )
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Error fetching workouts for {}: {}", user_id, e);
                Vec::new()
            });

        let streak = calculate_streak(&workouts);
        Ok(PartnerStats::new(&user, row, workouts, streak))
    }
}

impl StatsSource for PartnersService {
    fn fetch_partner_stats(
        &self,
        partner_id: Uuid,
    ) -> impl Future<Output = Result<PartnerStats>> + Send {
        async move {
            self.current_user_id().await?;
            self.stats_for(partner_id).await
        }
    }
}
