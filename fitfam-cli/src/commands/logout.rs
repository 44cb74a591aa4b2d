use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::Context;

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self, mut ctx: Context) -> Result<()> {
        if !ctx.config.is_authenticated() {
            println!("You are not logged in.");
            return Ok(());
        }

        // Local tokens go regardless of whether the backend accepted the revoke
        let result = ctx.app.sign_out().await;
        ctx.config.clear_tokens();
        ctx.config.save()?;

        match result {
            Ok(()) => println!("{} Logged out successfully!", "✓".green()),
            Err(e) => {
                tracing::warn!("Remote sign-out failed: {}", e);
                println!("{} Logged out locally (server said: {})", "✓".green(), e);
            }
        }
        Ok(())
    }
}
