//! Pure projection from dashboard state to HTML markup.
//!
//! Nothing here touches the network or mutates state: the same input
//! always produces byte-identical output. Every string that originated
//! from the operator or the backend goes through [`escape_html`].

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};

use crate::error::CoreError;
use crate::escape::escape_html;
use crate::model::{Site, SiteStatus, Stats};

/// Shown instead of a timestamp for sites that were never checked.
pub const NEVER_CHECKED: &str = "Никогда";

/// `toLocaleString('ru-RU')` layout.
pub const DEFAULT_TIME_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// Naive layouts the backend is known to emit (server local time).
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

// ── Options ──────────────────────────────────────────────────────────

/// Viewer locale: where offset-bearing timestamps are shifted to, and how
/// they are printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    utc_offset: FixedOffset,
    time_format: String,
}

impl RenderOptions {
    /// Validates `time_format` up front; chrono panics on a bad format
    /// string at display time.
    pub fn new(utc_offset: FixedOffset, time_format: impl Into<String>) -> Result<Self, CoreError> {
        let time_format = time_format.into();
        if StrftimeItems::new(&time_format).any(|item| matches!(item, Item::Error)) {
            return Err(CoreError::Config {
                message: format!("invalid time format '{time_format}'"),
            });
        }
        Ok(Self {
            utc_offset,
            time_format,
        })
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    pub fn time_format(&self) -> &str {
        &self.time_format
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            time_format: DEFAULT_TIME_FORMAT.into(),
        }
    }
}

// ── Sites ────────────────────────────────────────────────────────────

/// Render the sites list container contents.
///
/// An empty list renders the "no sites" placeholder, not an empty string.
pub fn render_sites(sites: &[Site], opts: &RenderOptions) -> String {
    if sites.is_empty() {
        return render_empty();
    }
    let mut out = String::new();
    for site in sites {
        render_site_card(&mut out, site, opts);
    }
    out
}

fn render_site_card(out: &mut String, site: &Site, opts: &RenderOptions) {
    let status = SiteStatus::from(site);
    let last_check = format_last_check(site.last_check.as_deref(), opts);
    let id = site.id;

    let _ = write!(
        out,
        r#"<div class="site-card" data-site-id="{id}">
    <div class="site-info">
        <div class="site-name">{name}</div>
        <div class="site-url">{url}</div>
    </div>
    <div class="site-status">
        <span class="status-badge {class}">{label}</span>
        <span class="last-check">Проверено: {last_check}</span>
    </div>
    <div class="site-actions">
        <button class="btn btn-secondary btn-small" data-action="check" data-site-id="{id}">Проверить</button>
        <button class="btn btn-danger btn-small" data-action="delete" data-site-id="{id}">Удалить</button>
    </div>
</div>
"#,
        name = escape_html(site.display_name()),
        url = escape_html(&site.url),
        class = status.as_ref(),
        label = status.label(),
        last_check = escape_html(&last_check),
    );
}

fn render_empty() -> String {
    r#"<div class="empty-state">
    <h3>Нет сайтов для мониторинга</h3>
    <p>Добавьте первый сайт, чтобы начать мониторинг</p>
</div>
"#
    .to_owned()
}

/// Placeholder shown while the first fetch is in flight.
pub fn render_loading() -> String {
    "<div class=\"loading\">Загрузка...</div>\n".to_owned()
}

/// Placeholder shown when the site list could not be fetched.
pub fn render_load_error() -> String {
    "<div class=\"loading\">Ошибка загрузки данных</div>\n".to_owned()
}

// ── Stats ────────────────────────────────────────────────────────────

/// Render the three aggregate counters. `None` (nothing fetched yet)
/// renders dashes.
pub fn render_stats(stats: Option<&Stats>) -> String {
    let counter = |value: Option<u64>| value.map_or_else(|| "-".to_owned(), |v| v.to_string());
    let total = counter(stats.map(|s| s.total_sites));
    let up = counter(stats.map(|s| s.up_sites));
    let down = counter(stats.map(|s| s.down_sites));

    format!(
        r#"<div class="stats">
    <div class="stat-card"><div class="stat-value" id="total-sites">{total}</div><div class="stat-label">Всего сайтов</div></div>
    <div class="stat-card up"><div class="stat-value" id="up-sites">{up}</div><div class="stat-label">Доступны</div></div>
    <div class="stat-card down"><div class="stat-value" id="down-sites">{down}</div><div class="stat-label">Недоступны</div></div>
</div>
"#
    )
}

// ── Timestamps ───────────────────────────────────────────────────────

/// Human-readable last-check time, or [`NEVER_CHECKED`].
///
/// RFC 3339 values are shifted into the viewer's offset. Naive values are
/// printed as-is; a layout asking for a zone or offset they lack falls back
/// to [`DEFAULT_TIME_FORMAT`]. Anything unparseable is returned verbatim
/// (callers escape it).
pub fn format_last_check(raw: Option<&str>, opts: &RenderOptions) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return NEVER_CHECKED.to_owned();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        let local = dt.with_timezone(&opts.utc_offset);
        return try_format(local.format(&opts.time_format))
            .unwrap_or_else(|| local.format(DEFAULT_TIME_FORMAT).to_string());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map_or_else(
            || raw.to_owned(),
            |naive| {
                try_format(naive.format(&opts.time_format))
                    .unwrap_or_else(|| naive.format(DEFAULT_TIME_FORMAT).to_string())
            },
        )
}

// `DelayedFormat` reports unformattable items as `fmt::Error`, which
// `to_string` turns into a panic.
fn try_format(formatted: impl std::fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{formatted}").ok()?;
    Some(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn site(id: i64, url: &str, name: Option<&str>, is_up: Option<bool>) -> Site {
        Site {
            id,
            url: url.into(),
            name: name.map(Into::into),
            is_up,
            last_check: None,
            consecutive_failures: 0,
        }
    }

    fn card_count(markup: &str) -> usize {
        markup.matches(r#"<div class="site-card""#).count()
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let markup = render_sites(&[], &RenderOptions::default());
        assert!(markup.contains("empty-state"));
        assert!(markup.contains("Нет сайтов для мониторинга"));
        assert_eq!(card_count(&markup), 0);
    }

    #[test]
    fn one_card_per_site_in_input_order() {
        let sites = vec![
            site(9, "https://z.test", Some("Zeta"), Some(true)),
            site(1, "https://a.test", Some("Alpha"), Some(false)),
            site(5, "https://m.test", None, None),
        ];
        let markup = render_sites(&sites, &RenderOptions::default());

        assert_eq!(card_count(&markup), 3);
        let z = markup.find("Zeta").unwrap();
        let a = markup.find("Alpha").unwrap();
        let m = markup.find(r#"<div class="site-name">https://m.test</div>"#).unwrap();
        assert!(z < a && a < m);
        assert!(!markup.contains("empty-state"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut s = site(1, "https://a.test", Some("A"), Some(true));
        s.last_check = Some("2024-06-15T10:30:00+00:00".into());
        let sites = vec![s, site(2, "https://b.test", None, None)];
        let opts = RenderOptions::default();

        assert_eq!(render_sites(&sites, &opts), render_sites(&sites, &opts));
    }

    #[test]
    fn status_badges_follow_tri_state() {
        let sites = vec![
            site(1, "u", None, Some(true)),
            site(2, "d", None, Some(false)),
            site(3, "n", None, None),
        ];
        let markup = render_sites(&sites, &RenderOptions::default());

        assert!(markup.contains(r#"<span class="status-badge up">Доступен</span>"#));
        assert!(markup.contains(r#"<span class="status-badge down">Недоступен</span>"#));
        assert!(markup.contains(r#"<span class="status-badge unknown">Не проверен</span>"#));
    }

    #[test]
    fn never_checked_sentinel() {
        let markup = render_sites(&[site(1, "u", None, None)], &RenderOptions::default());
        assert!(markup.contains("Проверено: Никогда"));
    }

    #[test]
    fn user_strings_are_escaped() {
        let evil = site(
            1,
            r#"https://x.test/?q="><script>"#,
            Some("<img src=x onerror=alert(1)>"),
            None,
        );
        let markup = render_sites(&[evil], &RenderOptions::default());

        assert!(!markup.contains("<script>"));
        assert!(!markup.contains("<img"));
        assert!(markup.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(markup.contains("https://x.test/?q=&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn empty_name_falls_back_to_url() {
        let markup = render_sites(
            &[site(1, "https://a.test", Some(""), None)],
            &RenderOptions::default(),
        );
        assert!(markup.contains(r#"<div class="site-name">https://a.test</div>"#));
    }

    #[test]
    fn action_buttons_carry_site_id() {
        let markup = render_sites(&[site(42, "u", None, None)], &RenderOptions::default());
        assert!(markup.contains(r#"data-action="check" data-site-id="42""#));
        assert!(markup.contains(r#"data-action="delete" data-site-id="42""#));
    }

    #[test]
    fn naive_timestamp_printed_as_is() {
        let opts = RenderOptions::default();
        assert_eq!(
            format_last_check(Some("2024-06-15 10:30:05.123456"), &opts),
            "15.06.2024, 10:30:05"
        );
        assert_eq!(
            format_last_check(Some("2024-06-15T08:00:00"), &opts),
            "15.06.2024, 08:00:00"
        );
    }

    #[test]
    fn offset_timestamp_shifted_to_viewer() {
        let msk = RenderOptions::new(FixedOffset::east_opt(3 * 3600).unwrap(), DEFAULT_TIME_FORMAT)
            .unwrap();
        assert_eq!(
            format_last_check(Some("2024-06-15T22:30:00Z"), &msk),
            "16.06.2024, 01:30:00"
        );
    }

    #[test]
    fn missing_or_blank_timestamp_is_never() {
        let opts = RenderOptions::default();
        assert_eq!(format_last_check(None, &opts), NEVER_CHECKED);
        assert_eq!(format_last_check(Some("  "), &opts), NEVER_CHECKED);
    }

    #[test]
    fn unparseable_timestamp_is_verbatim_and_escaped() {
        let opts = RenderOptions::default();
        assert_eq!(format_last_check(Some("yesterday"), &opts), "yesterday");

        let mut s = site(1, "u", None, None);
        s.last_check = Some("<soon>".into());
        let markup = render_sites(&[s], &opts);
        assert!(markup.contains("Проверено: &lt;soon&gt;"));
    }

    #[test]
    fn invalid_time_format_is_rejected() {
        assert!(RenderOptions::new(Utc.fix(), "%Q").is_err());
        assert!(RenderOptions::new(Utc.fix(), "%Y/%m/%d").is_ok());
    }

    #[test]
    fn zone_specifier_on_naive_timestamp_falls_back() {
        let opts = RenderOptions::new(Utc.fix(), "%d.%m.%Y %H:%M %z").unwrap();
        assert_eq!(
            format_last_check(Some("2024-06-15 10:30:05.123456"), &opts),
            "15.06.2024, 10:30:05"
        );

        let opts = RenderOptions::new(Utc.fix(), "%H:%M %Z").unwrap();
        let mut s = site(1, "https://a.test", None, Some(true));
        s.last_check = Some("2024-06-15 10:30:05".into());
        let markup = render_sites(&[s], &opts);
        assert!(markup.contains("Проверено: 15.06.2024, 10:30:05"));
    }

    #[test]
    fn zone_specifier_on_offset_timestamp_is_honored() {
        let opts = RenderOptions::new(Utc.fix(), "%H:%M %:z").unwrap();
        assert_eq!(
            format_last_check(Some("2024-06-15T22:30:00+03:00"), &opts),
            "19:30 +00:00"
        );
    }

    #[test]
    fn stats_counters() {
        let stats = Stats {
            total_sites: 5,
            up_sites: 3,
            down_sites: 1,
            recent_checks: Vec::new(),
        };
        let markup = render_stats(Some(&stats));
        assert!(markup.contains(r#"id="total-sites">5<"#));
        assert!(markup.contains(r#"id="up-sites">3<"#));
        assert!(markup.contains(r#"id="down-sites">1<"#));

        let blank = render_stats(None);
        assert!(blank.contains(r#"id="total-sites">-<"#));
    }
}
