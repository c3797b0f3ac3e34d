//! Statistics command handler.

use std::fmt::Write as _;

use tabled::Tabled;

use sitewatch_core::render::format_last_check;
use sitewatch_core::{CoreError, Dashboard, RecentCheck, RenderOptions, SiteStatus, Stats};

use crate::cli::{GlobalOpts, StatsArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Checked at")]
    checked_at: String,
    #[tabled(rename = "Response")]
    response: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl CheckRow {
    fn new(check: &RecentCheck, render: &RenderOptions, color: bool) -> Self {
        Self {
            url: check.url.clone(),
            status: output::paint_status(SiteStatus::from(Some(check.is_up)), color),
            checked_at: format_last_check(check.checked_at.as_deref(), render),
            response: check
                .response_time
                .map(|secs| format!("{:.0} ms", secs * 1000.0))
                .unwrap_or_default(),
            error: check.error_message.clone().unwrap_or_default(),
        }
    }
}

fn detail(stats: &Stats, render: &RenderOptions, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total:  {}", stats.total_sites);
    let _ = writeln!(out, "Up:     {}", stats.up_sites);
    let _ = write!(out, "Down:   {}", stats.down_sites);
    if !stats.recent_checks.is_empty() {
        let rows: Vec<CheckRow> = stats
            .recent_checks
            .iter()
            .map(|c| CheckRow::new(c, render, color))
            .collect();
        let _ = write!(out, "\n\n{}", output::render_table(&rows));
    }
    out
}

pub async fn handle(
    dashboard: &Dashboard,
    args: &StatsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let pb = util::spinner("Loading stats", global.quiet);
    let result = dashboard.client().fetch_stats().await;
    pb.finish_and_clear();
    let mut stats = result.map_err(CoreError::from)?;
    stats.recent_checks.truncate(args.limit);

    let color = output::should_color(&global.color);
    let render = &dashboard.config().render;
    let out = output::render_single(
        &global.output,
        &stats,
        |s| detail(s, render, color),
        |s| format!("{} {} {}", s.total_sites, s.up_sites, s.down_sites),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
