use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password};

use super::Context;

#[derive(Args)]
pub struct LoginCommand {
    /// Account email; prompted for when omitted
    #[arg(short, long)]
    email: Option<String>,
}

impl LoginCommand {
    pub async fn execute(self, mut ctx: Context) -> Result<()> {
        println!("FitFam - Login");
        println!();

        let email = match self.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };
        let password = Password::new().with_prompt("Password").interact()?;

        println!();
        println!("Signing in as {}...", email);

        match ctx.client().sign_in_with_password(&email, &password).await {
            Ok(session) => {
                ctx.config
                    .set_tokens(session.access_token, session.refresh_token);
                ctx.config.save()?;

                if let Err(e) = ctx.app.initialize().await {
                    tracing::warn!("Could not load profile: {}", e);
                }
                let name = match ctx.app.auth.user().await {
                    Some(user) => user.name,
                    None => session.user.email.unwrap_or(email),
                };

                println!("{} Login successful!", "✓".green());
                println!();
                println!("Welcome, {}!", name);
                Ok(())
            }
            Err(e) => {
                println!("{} Login failed: {}", "✗".red(), e);
                Err(e.into())
            }
        }
    }
}
