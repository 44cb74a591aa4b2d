use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FitFamError, Result};

pub const URL_ENV: &str = "FITFAM_URL";
pub const ANON_KEY_ENV: &str = "FITFAM_ANON_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub stats: StatsConfig,

    /// File this config was loaded from; `save` writes back to it
    #[serde(skip)]
    path: Option<PathBuf>,

    /// Backend section as read from the file, kept when env vars override it
    #[serde(skip)]
    file_backend: Option<BackendConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Trailing window of workouts fetched for a partner
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

// Default value functions
fn default_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_window_days() -> i64 {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            auth: AuthConfig::default(),
            stats: StatsConfig::default(),
            path: None,
            file_backend: None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            anon_key: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.fitfam/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| FitFamError::Config("Could not find home directory".to_string()))?;
        Ok(home.join(".fitfam"))
    }

    /// Get config file path (~/.fitfam/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    /// Load configuration from a file, falling back to defaults when it is missing.
    /// `FITFAM_URL` and `FITFAM_ANON_KEY` take precedence over the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .map_err(|e| FitFamError::Config(format!("Failed to read config file: {}", e)))?;
            toml::from_str::<Config>(&contents)
                .map_err(|e| FitFamError::Config(format!("Failed to parse config file: {}", e)))?
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Self::default()
        };

        config.path = Some(path.to_path_buf());
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        let url = std::env::var(URL_ENV).ok().filter(|v| !v.is_empty());
        let key = std::env::var(ANON_KEY_ENV).ok().filter(|v| !v.is_empty());
        if url.is_none() && key.is_none() {
            return;
        }

        self.file_backend = Some(self.backend.clone());
        if let Some(url) = url {
            self.backend.url = url;
        }
        if let Some(key) = key {
            self.backend.anon_key = key;
        }
    }

    /// Path `save` will write to
    pub fn path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Self::config_file(),
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.path()?)
    }

    /// Save configuration to an explicit file. Values that came from
    /// `FITFAM_URL` / `FITFAM_ANON_KEY` are written back as the file had them.
    pub fn save_to(&self, config_file: &Path) -> Result<()> {
        if let Some(dir) = config_file.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                FitFamError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let mut on_disk = self.clone();
        if let Some(backend) = &self.file_backend {
            on_disk.backend = backend.clone();
        }

        let contents = toml::to_string_pretty(&on_disk)
            .map_err(|e| FitFamError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_file, contents)
            .map_err(|e| FitFamError::Config(format!("Failed to write config file: {}", e)))?;

        tracing::debug!("Saved config to {:?}", config_file);
        Ok(())
    }

    /// Check if a session token is stored
    pub fn is_authenticated(&self) -> bool {
        !self.auth.access_token.is_empty()
    }

    /// Update session tokens
    pub fn set_tokens(&mut self, access_token: String, refresh_token: String) {
        self.auth.access_token = access_token;
        self.auth.refresh_token = refresh_token;
    }

    /// Clear session tokens
    pub fn clear_tokens(&mut self) {
        self.auth.access_token.clear();
        self.auth.refresh_token.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.url, "http://localhost:54321");
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.stats.window_days, 7);
        assert!(!config.is_authenticated());
    }

    #[test]
    #[serial]
    fn test_save_and_reload() {
        std::env::remove_var(URL_ENV);
        std::env::remove_var(ANON_KEY_ENV);

        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::load_from(&path).unwrap();
        config.backend.url = "https://project.example.co".to_string();
        config.set_tokens("access".to_string(), "refresh".to_string());
        config.save().unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.backend.url, "https://project.example.co");
        assert_eq!(reloaded.auth.access_token, "access");
        assert!(reloaded.is_authenticated());
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        std::env::remove_var(ANON_KEY_ENV);
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[backend]\nurl = \"https://from-file\"\nanon_key = \"file-key\"\n").unwrap();

        std::env::set_var(URL_ENV, "https://from-env");
        let config = Config::load_from(&path).unwrap();
        std::env::remove_var(URL_ENV);

        assert_eq!(config.backend.url, "https://from-env");
        assert_eq!(config.backend.anon_key, "file-key");
    }

    #[test]
    #[serial]
    fn test_env_overrides_are_not_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[backend]\nurl = \"https://prod\"\nanon_key = \"file-key\"\n").unwrap();

        std::env::set_var(URL_ENV, "https://staging");
        let mut config = Config::load_from(&path).unwrap();
        std::env::remove_var(URL_ENV);

        assert_eq!(config.backend.url, "https://staging");
        config.set_tokens("access".to_string(), "refresh".to_string());
        config.save().unwrap();

        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.contains("https://prod"));
        assert!(!saved.contains("https://staging"));

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.backend.url, "https://prod");
        assert_eq!(reloaded.auth.access_token, "access");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[auth]\naccess_token = \"t\"\n").unwrap();
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.stats.window_days, 7);
        assert!(config.is_authenticated());
    }
}
