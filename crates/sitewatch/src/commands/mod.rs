//! Command dispatch: bridges CLI args -> dashboard operations -> output formatting.

pub mod config_cmd;
pub mod sites;
pub mod stats;
pub mod util;
pub mod watch;

use sitewatch_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Watch(args) => watch::handle(dashboard, args, global).await,
        Command::Sites(args) => sites::handle(dashboard, args, global).await,
        Command::Stats(args) => stats::handle(&dashboard, &args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
