//! CLI configuration: thin wrapper around `sitewatch_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--server, --profile, --timeout) and fills --output / --color from the
//! file's `[defaults]` when neither flag nor env set them.

use std::time::Duration;

use clap::ValueEnum;
use clap::parser::{ArgMatches, ValueSource};
use sitewatch_core::DashboardConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use sitewatch_config::{
    Config, Profile, config_path, load_config, load_config_or_default,
    profile_to_dashboard_config, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Replace clap's built-in `--output` / `--color` defaults with the ones
/// from the config file. Explicit flags and env vars win.
pub fn apply_output_defaults(global: &mut GlobalOpts, matches: &ArgMatches) {
    let from_default = |id: &str| {
        matches!(
            matches.value_source(id),
            None | Some(ValueSource::DefaultValue)
        )
    };
    let (output, color) = (from_default("output"), from_default("color"));
    if !output && !color {
        return;
    }

    let defaults = load_config_or_default().defaults;
    if output {
        if let Some(format) = parse_default::<OutputFormat>("output", &defaults.output) {
            global.output = format;
        }
    }
    if color {
        if let Some(mode) = parse_default::<ColorMode>("color", &defaults.color) {
            global.color = mode;
        }
    }
}

fn parse_default<T: ValueEnum>(field: &str, value: &str) -> Option<T> {
    T::from_str(value, true)
        .inspect_err(|_| tracing::warn!(field, value, "ignoring unknown default in config"))
        .ok()
}

/// Build a `DashboardConfig` from the config file, profile, and flags.
///
/// Precedence: flag > env > profile > defaults. Without a matching
/// profile, `--server` alone is enough.
pub fn build_dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let profile = match (cfg.profiles.get(&profile_name), &global.server) {
        (Some(profile), server) => Profile {
            server: server.clone().unwrap_or_else(|| profile.server.clone()),
            ..profile.clone()
        },
        (None, Some(server)) => {
            // An explicitly requested profile must exist.
            if global.profile.is_some() {
                return Err(profile_not_found(&profile_name, &cfg));
            }
            Profile {
                server: server.clone(),
                ..Profile::default()
            }
        }
        (None, None) if global.profile.is_some() => {
            return Err(profile_not_found(&profile_name, &cfg));
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    let mut dashboard = profile_to_dashboard_config(&profile, &cfg.defaults)?;
    if let Some(secs) = global.timeout {
        dashboard.timeout = Duration::from_secs(secs);
    }
    Ok(dashboard)
}

fn profile_not_found(name: &str, cfg: &Config) -> CliError {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    CliError::ProfileNotFound {
        name: name.into(),
        available: if names.is_empty() {
            "(none)".into()
        } else {
            names.join(", ")
        },
    }
}
