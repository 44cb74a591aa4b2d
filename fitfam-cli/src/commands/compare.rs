use anyhow::Result;
use clap::Args;
use colored::Colorize;
use uuid::Uuid;

use fitfam::comparison::Comparison;
use fitfam::routes::partner_route;

use super::Context;
use crate::ui::comparison::NO_WORKOUTS;
use crate::ui::card::favorite_label;
use crate::ui::{self, render_comparison};

#[derive(Args)]
pub struct CompareCommand {
    /// Partner user ID
    partner_id: Uuid,

    /// Flip the partner's favorite mark before showing the comparison
    #[arg(long)]
    toggle_favorite: bool,
}

impl CompareCommand {
    pub async fn execute(self, mut ctx: Context) -> Result<()> {
        ctx.require_login()?;
        let result = self.run(&ctx).await;
        ctx.persist_session().await?;
        result
    }

    async fn run(&self, ctx: &Context) -> Result<()> {
        let store = &ctx.app.partner_stats;
        let service = ctx.service();

        let spinner = ui::spinner("Loading stats...");
        let (partner, own, favorite) = tokio::join!(
            store.load_partner_stats(self.partner_id),
            service.get_own_stats(),
            service.is_favorite_partner(self.partner_id)
        );
        spinner.finish_and_clear();

        let Some(partner) = partner else {
            if let Some(reason) = store.error().await {
                tracing::warn!("Failed to load partner stats: {}", reason);
                println!("{} {}", "!".yellow(), reason);
            }
            println!("{}", NO_WORKOUTS.dimmed());
            return Ok(());
        };

        let own = match own {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!("Own stats unavailable: {}", e);
                None
            }
        };

        let mut is_favorite = favorite?;
        if self.toggle_favorite {
            service
                .toggle_favorite_partner(self.partner_id, !is_favorite)
                .await?;
            is_favorite = !is_favorite;
        }

        let comparison = Comparison::build(own.as_ref(), &partner);
        println!("{}", render_comparison(&comparison));
        println!();
        println!("{}", favorite_label(is_favorite));
        println!();
        println!("{}", partner_route(self.partner_id));
        Ok(())
    }
}
