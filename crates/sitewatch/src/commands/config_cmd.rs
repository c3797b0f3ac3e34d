//! Config subcommand handlers.

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("sitewatch configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let server: String = Input::new()
                .with_prompt("Backend URL")
                .default("http://localhost:5000".into())
                .validate_with(|s: &String| {
                    sitewatch_config::parse_server(s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let refresh_interval: u64 = Input::new()
                .with_prompt("Refresh interval (seconds)")
                .default(30)
                .validate_with(|n: &u64| if *n == 0 { Err("must be at least 1") } else { Ok(()) })
                .interact_text()
                .map_err(prompt_err)?;

            // Merge into the existing file rather than clobbering it.
            let mut cfg = config::load_config().unwrap_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    server,
                    refresh_interval: Some(refresh_interval),
                    ..Profile::default()
                },
            );
            if cfg.profiles.len() == 1 {
                cfg.default_profile = Some(profile_name.clone());
            }

            let path = config::save_config(&cfg)?;
            eprintln!("\n   Profile '{profile_name}' saved to {}", path.display());
            Ok(())
        }

        // ── Show: resolved configuration ────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(
                &global.output,
                &cfg,
                format_config,
                |c: &Config| {
                    let mut names: Vec<_> = c.profiles.keys().cloned().collect();
                    names.sort();
                    names.join("\n")
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

/// TOML-style listing with profiles in name order.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "refresh_interval = {}", cfg.defaults.refresh_interval);
    let _ = writeln!(out, "time_format = \"{}\"", cfg.defaults.time_format);
    if let Some(ref offset) = cfg.defaults.utc_offset {
        let _ = writeln!(out, "utc_offset = \"{offset}\"");
    }

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(interval) = p.refresh_interval {
            let _ = writeln!(out, "refresh_interval = {interval}");
        }
        if let Some(ref fmt) = p.time_format {
            let _ = writeln!(out, "time_format = \"{fmt}\"");
        }
        if let Some(ref offset) = p.utc_offset {
            let _ = writeln!(out, "utc_offset = \"{offset}\"");
        }
    }

    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_listed_in_name_order() {
        let mut cfg = Config::default();
        for (name, server) in [("zeta", "http://z:5000"), ("alpha", "http://a:5000")] {
            cfg.profiles.insert(
                name.into(),
                Profile {
                    server: server.into(),
                    ..Profile::default()
                },
            );
        }
        let out = format_config(&cfg);
        let alpha = out.find("[profiles.alpha]");
        let zeta = out.find("[profiles.zeta]");
        assert!(alpha.is_some() && zeta.is_some());
        assert!(alpha < zeta);
        assert!(out.contains("refresh_interval = 30"));
    }
}
