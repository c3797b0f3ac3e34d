//! Full HTML document for `watch --page`.
//!
//! Wraps the fragments the dashboard renders (stats counters, site list,
//! add-site dialog) in a static page shell.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Utc};

use sitewatch_core::{DashboardView, ModalController};

use crate::error::CliError;

const STYLE: &str = r"
body { font-family: sans-serif; margin: 0; background: #f4f6f8; color: #222; }
header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; background: #2c3e50; color: #fff; }
main { padding: 1rem 2rem; }
.stats { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
.stat-card { flex: 1; background: #fff; border-radius: 8px; padding: 1rem; text-align: center; }
.stat-value { font-size: 2rem; font-weight: bold; }
.site-card { display: flex; justify-content: space-between; align-items: center; background: #fff; border-radius: 8px; padding: 1rem; margin-bottom: .75rem; }
.site-url { color: #666; font-size: .9rem; }
.status-badge { padding: .2rem .6rem; border-radius: 12px; font-size: .85rem; }
.status-badge.up { background: #d4edda; color: #155724; }
.status-badge.down { background: #f8d7da; color: #721c24; }
.status-badge.unknown { background: #fff3cd; color: #856404; }
.last-check { display: block; color: #888; font-size: .8rem; margin-top: .25rem; }
.loading, .empty-state { text-align: center; padding: 2rem; color: #888; }
.modal { position: fixed; inset: 0; background: rgba(0, 0, 0, .5); }
.modal-content { background: #fff; max-width: 420px; margin: 10vh auto; padding: 1.5rem; border-radius: 8px; }
.modal-content input { display: block; width: 100%; margin: .25rem 0 1rem; }
footer { padding: 1rem 2rem; color: #888; font-size: .8rem; }
";

/// Compose the complete document.
pub fn render_page(
    view: &DashboardView,
    modal: &ModalController,
    offset: FixedOffset,
    time_format: &str,
) -> String {
    let mut out = String::with_capacity(4096);
    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<title>Мониторинг сайтов</title>
<style>{STYLE}</style>
</head>
<body>
<header>
    <h1>Мониторинг сайтов</h1>
    <div class="header-actions">
        <button class="btn btn-secondary" data-action="refresh">Обновить</button>
        <button class="btn btn-primary" data-action="open-modal">Добавить сайт</button>
    </div>
</header>
<main>
{stats}<div id="sites-list" class="sites-list">
{sites}</div>
</main>
{modal}<footer>{footer}</footer>
</body>
</html>
"#,
        stats = view.stats_markup(),
        sites = view.sites.markup(),
        modal = modal.markup(),
        footer = footer(view.updated_at, offset, time_format),
    );
    out
}

fn footer(updated_at: Option<DateTime<Utc>>, offset: FixedOffset, time_format: &str) -> String {
    updated_at.map_or_else(
        || "Загрузка...".to_owned(),
        |ts| {
            format!(
                "Обновлено: {}",
                ts.with_timezone(&offset).format(time_format)
            )
        },
    )
}

/// Write the page next to `path` and rename it into place, so a browser
/// reloading the file never sees a partial document.
pub fn write_page(path: &Path, html: &str) -> Result<(), CliError> {
    let tmp = path.with_extension("html.tmp");
    std::fs::write(&tmp, html)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
