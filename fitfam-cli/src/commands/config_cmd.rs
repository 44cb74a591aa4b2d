use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

use fitfam::config::Config;

fn resolve(path: Option<&str>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(Config::config_file()?),
    }
}

pub fn show_config(path: Option<&str>) -> Result<()> {
    let file = resolve(path)?;
    let mut config = Config::load_from(&file)?;
    if config.is_authenticated() {
        config.auth.access_token = "********".to_string();
        config.auth.refresh_token = "********".to_string();
    }

    println!("Current Configuration ({})", file.display());
    println!("────────────────────────────────");
    println!();
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn init_config(path: Option<&str>, force: bool) -> Result<()> {
    let file = resolve(path)?;

    if file.exists() && !force {
        println!("Configuration file already exists at: {}", file.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    write_defaults(&file)?;
    println!(
        "{} Configuration initialized at: {}",
        "✓".green(),
        file.display()
    );
    println!();
    println!("Set backend.url and backend.anon_key, then run 'fitfam login'.");
    Ok(())
}

fn write_defaults(file: &Path) -> Result<()> {
    // Plain defaults: env overrides must not end up in the file
    Config::default().save_to(file)?;
    Ok(())
}
