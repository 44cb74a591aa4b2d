use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use fitfam::models::{InviteResponse, PartnerLists, PartnerStats, Partnership, PartnershipStatus};

use super::Context;
use crate::ui::{self, render_card, render_profile, CardView};

#[derive(Subcommand)]
pub enum PartnersSubcommands {
    /// List sent and received invites with partner stats
    List,

    /// Search users by name or username
    Search {
        /// Text to look for
        query: String,
    },

    /// Invite a user to become your partner
    Invite {
        /// User ID from `fitfam partners search`
        user_id: Uuid,
    },

    /// Accept a received invite
    Accept {
        /// Invite ID
        invite_id: Uuid,
    },

    /// Decline a received invite
    Decline {
        /// Invite ID
        invite_id: Uuid,
    },

    /// Withdraw an invite you sent
    Cancel {
        /// Invite ID
        invite_id: Uuid,
    },

    /// Show an accepted partner's stats and favorite state
    Show {
        /// Partner user ID
        partner_id: Uuid,
    },

    /// Mark an accepted partner as favorite
    Favorite {
        /// Partner user ID
        partner_id: Uuid,

        /// Remove the favorite mark instead
        #[arg(long)]
        off: bool,
    },
}

impl PartnersSubcommands {
    pub async fn execute(self, mut ctx: Context) -> Result<()> {
        ctx.require_login()?;
        let result = self.run(&ctx).await;
        ctx.persist_session().await?;
        result
    }

    async fn run(self, ctx: &Context) -> Result<()> {
        let service = ctx.service();
        match self {
            Self::List => list_partners(ctx).await,
            Self::Search { query } => {
                let users = service.search_users(&query).await?;
                if users.is_empty() {
                    println!("No users found for \"{}\".", query);
                    return Ok(());
                }

                println!("Users matching \"{}\"", query);
                println!("────────────────────────────────");
                for user in &users {
                    println!(
                        "{}  {}  {}",
                        user.name.bold(),
                        user.handle().dimmed(),
                        user.id
                    );
                }
                println!();
                println!("Invite someone with: fitfam partners invite <user-id>");
                Ok(())
            }
            Self::Invite { user_id } => {
                let invite = service.send_partner_invite(user_id).await?;
                println!("{} Invite sent ({})", "✓".green(), invite.id);
                Ok(())
            }
            Self::Accept { invite_id } => {
                service
                    .respond_to_invite(invite_id, InviteResponse::Accepted)
                    .await?;
                println!("{} Invite accepted!", "✓".green());
                Ok(())
            }
            Self::Decline { invite_id } => {
                service
                    .respond_to_invite(invite_id, InviteResponse::Rejected)
                    .await?;
                println!("{} Invite declined.", "✓".green());
                Ok(())
            }
            Self::Cancel { invite_id } => {
                service.cancel_invite(invite_id).await?;
                println!("{} Invite cancelled.", "✓".green());
                Ok(())
            }
            Self::Show { partner_id } => {
                let profile = service.get_partner_stats(partner_id).await?;
                println!("{}", render_profile(&profile));
                Ok(())
            }
            Self::Favorite { partner_id, off } => {
                service.toggle_favorite_partner(partner_id, !off).await?;
                if off {
                    println!("{} Removed from favorites.", "✓".green());
                } else {
                    println!("{} Added to favorites.", "✓".green());
                }
                Ok(())
            }
        }
    }
}

async fn list_partners(ctx: &Context) -> Result<()> {
    let me = ctx.client().require_user().await?.id;
    let lists = ctx.service().get_partners().await?;

    if lists.is_empty() {
        println!("No partners yet.");
        println!();
        println!("Find someone with: fitfam partners search <name>");
        return Ok(());
    }

    let mut controller = ctx.app.fetch_controller();
    controller.observe_lists(&lists, me);
    let loading = controller.in_flight();
    if loading > 0 {
        let spinner = ui::spinner(&format!("Loading stats for {} partner(s)...", loading));
        controller.join().await;
        spinner.finish_and_clear();
    }

    let stats = ctx.app.partner_stats.snapshot().await;
    print_section("Sent Invites", &lists.sent, me, &stats);
    print_section("Received Invites", &lists.received, me, &stats);

    if let Some(error) = ctx.app.partner_stats.error().await {
        println!("{} Some partner stats could not be loaded: {}", "!".yellow(), error);
    }
    summarize(&lists);
    Ok(())
}

fn print_section(
    title: &str,
    partnerships: &[Partnership],
    me: Uuid,
    stats: &HashMap<Uuid, Arc<PartnerStats>>,
) {
    if partnerships.is_empty() {
        return;
    }

    println!("{}", title.bold());
    println!("────────────────────────────────");
    for partnership in partnerships {
        let Some(view) = CardView::for_partnership(partnership, me) else {
            tracing::debug!("Skipping partnership {} without a counterpart", partnership.id);
            continue;
        };
        let partner_stats = stats.get(&view.partner.id).map(Arc::as_ref);
        println!("{}", render_card(&view.with_stats(partner_stats)));
        println!();
    }
}

fn summarize(lists: &PartnerLists) {
    let accepted = lists.accepted().count();
    let pending = lists
        .sent
        .iter()
        .chain(lists.received.iter())
        .filter(|p| p.status == PartnershipStatus::Pending)
        .count();
    println!("{} partner(s), {} pending invite(s)", accepted, pending);
}
