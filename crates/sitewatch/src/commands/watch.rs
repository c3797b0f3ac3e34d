//! Live dashboard: poller plus a line-oriented operator prompt.
//!
//! Every published view (and every modal change) is written as a complete
//! HTML page to `--page`, or summarized on stderr without it. Operator
//! input is read one line at a time on a helper thread so that prompts
//! raised by an action (delete confirmation) read from the same stdin.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use owo_colors::OwoColorize;
use tokio::sync::oneshot;
use tracing::{debug, info};

use sitewatch_core::{
    ActionDispatcher, Dashboard, DashboardView, ModalController, Operator, Poller, SitesPanel,
};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::page;

const HELP: &str = "\
commands:
  add <url> [name]   add a site
  open | close       show / hide the add-site dialog
  url <value>        set the dialog's url field
  name <value>       set the dialog's name field
  submit             submit the dialog
  click <element>    pointer interaction (e.g. click add-site-modal)
  delete <id>        stop monitoring a site
  check <id>         check a site now
  refresh            reload sites and stats
  help               this text
  quit               exit";

// ── Operator input ──────────────────────────────────────────────────

/// One parsed line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Add { url: String, name: String },
    Open,
    Close,
    Url(String),
    Name(String),
    Submit,
    Click(String),
    Delete(i64),
    Check(i64),
    Refresh,
    Help,
    Quit,
    Empty,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let site_id = |what: &str| {
        rest.parse::<i64>()
            .map_err(|_| format!("usage: {what} <id> (numeric site id)"))
    };

    Ok(match word {
        "" => Input::Empty,
        "add" => {
            let (url, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Input::Add {
                url: url.to_owned(),
                name: name.trim().to_owned(),
            }
        }
        "open" => Input::Open,
        "close" => Input::Close,
        "url" => Input::Url(rest.to_owned()),
        "name" => Input::Name(rest.to_owned()),
        "submit" => Input::Submit,
        "click" => Input::Click(rest.to_owned()),
        "delete" | "rm" => Input::Delete(site_id("delete")?),
        "check" => Input::Check(site_id("check")?),
        "refresh" | "r" => Input::Refresh,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    })
}

/// Read one line of stdin on a detached thread. `None` on EOF.
fn read_line() -> oneshot::Receiver<io::Result<Option<String>>> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut buf = String::new();
        let result = io::stdin()
            .lock()
            .read_line(&mut buf)
            .map(|n| (n > 0).then_some(buf));
        let _ = tx.send(result);
    });
    rx
}

/// Operator for the watch prompt: confirmations are answered on stdin,
/// notifications go to stderr.
struct ConsoleOperator {
    yes: bool,
}

impl Operator for ConsoleOperator {
    fn confirm(&self, prompt: &str) -> bool {
        if self.yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        // No line reader is pending while an action runs.
        let mut answer = String::new();
        let read = tokio::task::block_in_place(|| io::stdin().lock().read_line(&mut answer));
        read.is_ok() && is_affirmative(&answer)
    }

    fn notify(&self, message: &str) {
        eprintln!("{} {message}", "✗".red());
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "д" | "да"
    )
}

// ── Presentation ────────────────────────────────────────────────────

struct Surface {
    page: Option<std::path::PathBuf>,
    quiet: bool,
}

impl Surface {
    fn show(
        &self,
        view: &DashboardView,
        modal: &ModalController,
        dashboard: &Dashboard,
    ) -> Result<(), CliError> {
        if let Some(path) = &self.page {
            let render = &dashboard.config().render;
            let html = page::render_page(view, modal, render.utc_offset(), render.time_format());
            page::write_page(path, &html)?;
            debug!(path = %path.display(), "page written");
        } else if !self.quiet {
            eprintln!("{}", summary(view, modal));
        }
        Ok(())
    }
}

fn summary(view: &DashboardView, modal: &ModalController) -> String {
    let sites = match &view.sites {
        SitesPanel::Loading => "loading".to_owned(),
        SitesPanel::Ready { count, .. } => format!("{count} sites"),
        SitesPanel::LoadFailed { .. } => "sites unavailable".to_owned(),
    };
    let counters = view.stats.as_ref().map_or_else(
        || "up - / down -".to_owned(),
        |s| format!("up {} / down {}", s.up_sites, s.down_sites),
    );
    let updated = view
        .updated_at
        .map(|t| t.format("%H:%M:%S UTC").to_string())
        .unwrap_or_default();
    let dialog = if modal.is_visible() {
        " · dialog open"
    } else {
        ""
    };
    format!("[{updated}] {sites} · {counters}{dialog}")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: Dashboard,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let period = match args.interval {
        Some(0) => {
            return Err(CliError::Validation {
                field: "interval".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Some(secs) => Duration::from_secs(secs),
        None => dashboard.config().refresh_interval,
    };

    let surface = Surface {
        page: args.page,
        quiet: global.quiet,
    };
    let operator: Arc<dyn Operator> = Arc::new(ConsoleOperator { yes: global.yes });
    let dispatcher = ActionDispatcher::new(dashboard.clone(), operator);
    let mut modal = ModalController::new();
    let mut views = dashboard.view();
    let mut poller = Poller::with_period(dashboard.clone(), period);

    poller.start().await;
    surface.show(&latest(&mut views), &modal, &dashboard)?;
    if !global.quiet {
        eprintln!("watching {} (type 'help' for commands)", dashboard.client().base_url());
    }

    let mut line = read_line();
    let result = loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break Ok(()),
            received = &mut line => {
                let text = match received {
                    Ok(Ok(Some(text))) => text,
                    Ok(Ok(None)) | Err(_) => break Ok(()),
                    Ok(Err(e)) => break Err(CliError::Io(e)),
                };
                match parse_input(&text) {
                    Ok(Input::Quit) => break Ok(()),
                    Ok(input) => {
                        run_input(input, &dispatcher, &mut modal).await;
                        if let Err(e) = surface.show(&latest(&mut views), &modal, &dashboard) {
                            break Err(e);
                        }
                    }
                    Err(message) => eprintln!("{message}"),
                }
                line = read_line();
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                if let Err(e) = surface.show(&latest(&mut views), &modal, &dashboard) {
                    break Err(e);
                }
            }
        }
    };

    poller.stop().await;
    info!("watch finished");
    result
}

fn latest(views: &mut tokio::sync::watch::Receiver<DashboardView>) -> DashboardView {
    views.borrow_and_update().clone()
}

async fn run_input(input: Input, dispatcher: &ActionDispatcher, modal: &mut ModalController) {
    // Failures were already reported through the operator.
    let outcome = match input {
        Input::Add { url, name } => {
            modal.open();
            modal.set_url(url);
            modal.set_name(name);
            dispatcher.add_site(modal).await.map(|_| ())
        }
        Input::Submit => dispatcher.add_site(modal).await.map(|_| ()),
        Input::Open => {
            modal.open();
            Ok(())
        }
        Input::Close => {
            modal.close();
            Ok(())
        }
        Input::Url(url) => {
            modal.set_url(url);
            Ok(())
        }
        Input::Name(name) => {
            modal.set_name(name);
            Ok(())
        }
        Input::Click(target) => {
            modal.on_pointer(&target);
            Ok(())
        }
        Input::Delete(id) => dispatcher.delete_site(id).await,
        Input::Check(id) => dispatcher.check_now(id).await,
        Input::Refresh => {
            dispatcher.refresh().await;
            Ok(())
        }
        Input::Help => {
            eprintln!("{HELP}");
            Ok(())
        }
        Input::Quit | Input::Empty => Ok(()),
    };
    if let Err(e) = outcome {
        debug!(error = %e, "action did not complete");
    }
}
