use crate::fetch::MismatchPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Caller-side retry parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of fetch attempts (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/digestfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Seconds allowed for establishing the connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole download.
    pub transfer_timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/s ...
    pub low_speed_limit_bytes: u32,
    /// ... for this many seconds.
    pub low_speed_time_secs: u64,
    /// What to do with a download whose checksum does not match: "delete" or "quarantine".
    #[serde(default)]
    pub on_mismatch: MismatchPolicy,
    /// Manifest used by `fetch` when none is given on the command line.
    #[serde(default)]
    pub manifest: Option<PathBuf>,
    /// Optional retry policy for `fetch --retry`; built-in defaults when missing.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            transfer_timeout_secs: 3600,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            on_mismatch: MismatchPolicy::Delete,
            manifest: None,
            retry: None,
        }
    }
}

/// Where the config file lives, creating its directory.
pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("digestfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Where the config file lives. Touches nothing on disk.
pub fn config_file() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("digestfetch")?;
    Ok(xdg_dirs.get_config_file("config.toml"))
}

/// Load configuration from an explicit file (must exist).
pub fn load_from(path: &Path) -> Result<Config> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = Config::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}
