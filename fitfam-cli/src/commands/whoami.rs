use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::Context;

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(self, mut ctx: Context) -> Result<()> {
        if !ctx.config.is_authenticated() {
            println!("You are not logged in.");
            println!();
            println!("Use 'fitfam login' to authenticate.");
            return Ok(());
        }

        let result = ctx.app.initialize().await;
        ctx.persist_session().await?;
        result?;

        match ctx.app.auth.user().await {
            Some(user) => {
                println!("{} Authenticated as:", "✓".green());
                println!();
                println!("  Name:     {}", user.name);
                println!("  Username: {}", user.handle());
                if let Some(email) = &user.email {
                    println!("  Email:    {}", email);
                }
                println!("  User ID:  {}", user.id);
                Ok(())
            }
            None => {
                println!("{} Your session has expired.", "✗".red());
                println!();
                println!("Use 'fitfam login' to authenticate again.");
                Ok(())
            }
        }
    }
}
