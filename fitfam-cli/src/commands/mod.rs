mod compare;
mod config_cmd;
mod context;
mod login;
mod logout;
mod partners;
mod whoami;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use compare::CompareCommand;
pub use context::Context;
pub use login::LoginCommand;
pub use logout::LogoutCommand;
pub use partners::PartnersSubcommands;
pub use whoami::WhoamiCommand;

#[derive(Parser)]
#[command(name = "fitfam")]
#[command(about = "Workout partners from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "FITFAM_CONFIG")]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to FitFam
    Login(LoginCommand),

    /// Sign out and forget cached partner data
    Logout(LogoutCommand),

    /// Show current user information
    Whoami(WhoamiCommand),

    /// Find, invite and manage workout partners
    #[command(subcommand)]
    Partners(PartnersSubcommands),

    /// Compare your week with an accepted partner
    Compare(CompareCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        let config_path = self.config.as_deref();
        match self.command {
            Commands::Login(cmd) => cmd.execute(Context::load(config_path)?).await,
            Commands::Logout(cmd) => cmd.execute(Context::load(config_path)?).await,
            Commands::Whoami(cmd) => cmd.execute(Context::load(config_path)?).await,
            Commands::Partners(subcmd) => subcmd.execute(Context::load(config_path)?).await,
            Commands::Compare(cmd) => cmd.execute(Context::load(config_path)?).await,
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config_path),
                ConfigSubcommands::Init { force } => config_cmd::init_config(config_path, force),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
