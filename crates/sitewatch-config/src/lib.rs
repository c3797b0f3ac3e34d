//! Shared configuration for the sitewatch dashboard.
//!
//! TOML profiles naming backend servers, layered defaults → file →
//! `SITEWATCH_` environment, and translation to
//! `sitewatch_core::DashboardConfig`. The CLI adds flag-aware wrappers on
//! top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{FixedOffset, Local, Offset};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sitewatch_core::render::DEFAULT_TIME_FORMAT;
use sitewatch_core::{DashboardConfig, RenderOptions};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Poller cadence in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// strftime layout for last-check timestamps.
    #[serde(default = "default_time_format")]
    pub time_format: String,

    /// Viewer offset such as `+03:00`. Unset means the machine's local offset.
    #[serde(default)]
    pub utc_offset: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
            time_format: default_time_format(),
            utc_offset: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    30
}
fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.into()
}

/// A named backend profile. Unset fields fall back to [`Defaults`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "http://localhost:5000").
    pub server: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "sitewatch", "sitewatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sitewatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Nested keys in the environment use a double underscore:
/// `SITEWATCH_DEFAULTS__REFRESH_INTERVAL=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SITEWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse a `+HH:MM` / `-HH:MM` offset; `None` resolves to local time.
pub fn parse_utc_offset(raw: Option<&str>) -> Result<FixedOffset, ConfigError> {
    match raw {
        None => Ok(Local::now().offset().fix()),
        Some(s) => s.trim().parse().map_err(|_| ConfigError::Validation {
            field: "utc_offset".into(),
            reason: format!("expected +HH:MM or -HH:MM, got '{s}'"),
        }),
    }
}

/// Parse a backend base URL.
pub fn parse_server(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

/// Build a `DashboardConfig` from a profile plus global defaults.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let server = parse_server(&profile.server)?;

    let refresh_secs = profile.refresh_interval.unwrap_or(defaults.refresh_interval);
    if refresh_secs == 0 {
        return Err(ConfigError::Validation {
            field: "refresh_interval".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let offset = parse_utc_offset(
        profile
            .utc_offset
            .as_deref()
            .or(defaults.utc_offset.as_deref()),
    )?;
    let time_format = profile
        .time_format
        .clone()
        .unwrap_or_else(|| defaults.time_format.clone());
    let render = RenderOptions::new(offset, time_format).map_err(|e| ConfigError::Validation {
        field: "time_format".into(),
        reason: e.to_string(),
    })?;

    Ok(DashboardConfig {
        server,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        refresh_interval: Duration::from_secs(refresh_secs),
        render,
    })
}

/// Look up `name` and translate it.
pub fn resolve_profile(config: &Config, name: &str) -> Result<DashboardConfig, ConfigError> {
    let profile = config
        .profiles
        .get(name)
        .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })?;
    profile_to_dashboard_config(profile, &config.defaults)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(server: &str) -> Profile {
        Profile {
            server: server.into(),
            ..Profile::default()
        }
    }

    #[test]
    fn profile_falls_back_to_defaults() {
        let defaults = Defaults {
            utc_offset: Some("+03:00".into()),
            ..Defaults::default()
        };
        let cfg = profile_to_dashboard_config(&profile("http://localhost:5000"), &defaults).unwrap();

        assert_eq!(cfg.server.as_str(), "http://localhost:5000/");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.refresh_interval, Duration::from_secs(30));
        assert_eq!(cfg.render.utc_offset().local_minus_utc(), 3 * 3600);
        assert_eq!(cfg.render.time_format(), DEFAULT_TIME_FORMAT);
    }

    #[test]
    fn profile_overrides_defaults() {
        let p = Profile {
            server: "https://mon.example".into(),
            timeout: Some(5),
            refresh_interval: Some(10),
            time_format: Some("%H:%M".into()),
            utc_offset: Some("-05:00".into()),
        };
        let cfg = profile_to_dashboard_config(&p, &Defaults::default()).unwrap();

        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.refresh_interval, Duration::from_secs(10));
        assert_eq!(cfg.render.time_format(), "%H:%M");
        assert_eq!(cfg.render.utc_offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn rejects_bad_server() {
        assert!(matches!(
            profile_to_dashboard_config(&profile("not a url"), &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            profile_to_dashboard_config(&profile("ftp://files.example"), &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn rejects_zero_interval() {
        let p = Profile {
            refresh_interval: Some(0),
            ..profile("http://localhost:5000")
        };
        let err = profile_to_dashboard_config(&p, &Defaults::default()).unwrap_err();
        assert!(err.to_string().contains("refresh_interval"));
    }

    #[test]
    fn rejects_bad_offset_and_format() {
        let p = Profile {
            utc_offset: Some("Moscow".into()),
            ..profile("http://localhost:5000")
        };
        assert!(profile_to_dashboard_config(&p, &Defaults::default()).is_err());

        let p = Profile {
            time_format: Some("%Q".into()),
            utc_offset: Some("+00:00".into()),
            ..profile("http://localhost:5000")
        };
        let err = profile_to_dashboard_config(&p, &Defaults::default()).unwrap_err();
        assert!(err.to_string().contains("time_format"));
    }

    #[test]
    fn missing_profile_is_reported() {
        let err = resolve_profile(&Config::default(), "prod").unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound { name } if name == "prod"));
    }
}
