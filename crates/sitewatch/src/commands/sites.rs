//! Site command handlers.

use std::sync::Arc;

use dialoguer::Input;
use tabled::Tabled;

use sitewatch_core::render::format_last_check;
use sitewatch_core::{
    ActionDispatcher, CoreError, CreatedSite, Dashboard, RenderOptions, Site, SiteStatus,
};

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last check")]
    last_check: String,
    #[tabled(rename = "Failures")]
    failures: u32,
}

impl SiteRow {
    fn new(site: &Site, render: &RenderOptions, color: bool) -> Self {
        Self {
            id: site.id,
            name: site.display_name().to_owned(),
            url: site.url.clone(),
            status: output::paint_status(SiteStatus::from(site), color),
            last_check: format_last_check(site.last_check.as_deref(), render),
            failures: site.consecutive_failures,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: Dashboard,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let operator = Arc::new(util::TerminalOperator::new(global.yes, false));
    let dispatcher = ActionDispatcher::new(dashboard.clone(), operator).without_refresh();

    match args.command {
        SitesCommand::List => {
            let pb = util::spinner("Loading sites", global.quiet);
            let result = dashboard.client().list_sites().await;
            pb.finish_and_clear();
            let sites = result.map_err(CoreError::from)?;

            let color = output::should_color(&global.color);
            let render = &dashboard.config().render;
            let out = output::render_list(
                &global.output,
                &sites,
                |s| SiteRow::new(s, render, color),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Add { url, name } => {
            let url = match url {
                Some(url) => url,
                None => Input::<String>::new()
                    .with_prompt("URL")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(util::prompt_err)?,
            };
            let name = name.unwrap_or_default();

            let pb = util::spinner("Adding site", global.quiet);
            let result = dispatcher.create_site(&url, &name).await;
            pb.finish_and_clear();
            let created = result?;

            let out = output::render_single(
                &global.output,
                &created,
                |c| match c.id() {
                    Some(id) => format!("Site added (id {id})"),
                    None => "Site added".to_owned(),
                },
                |c: &CreatedSite| c.id().map(|id| id.to_string()).unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Delete { id } => {
            dispatcher
                .delete_site(id)
                .await
                .map_err(|e| CliError::for_site(e, id))?;
            if !global.quiet {
                eprintln!("Site {id} deleted");
            }
            Ok(())
        }

        SitesCommand::Check { id } => {
            let pb = util::spinner("Requesting check", global.quiet);
            let result = dispatcher.check_now(id).await;
            pb.finish_and_clear();
            result.map_err(|e| CliError::for_site(e, id))?;
            if !global.quiet {
                eprintln!("Check requested for site {id}");
            }
            Ok(())
        }
    }
}
