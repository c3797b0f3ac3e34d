// ── Published view ──
//
// Everything the presentation surface shows, as one value. The dashboard
// publishes a new `DashboardView` through a `watch` channel after every
// panel update; front-ends only ever read it.

use chrono::{DateTime, Utc};

use crate::model::Stats;
use crate::render;

/// State of the sites list container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SitesPanel {
    /// Nothing fetched yet.
    #[default]
    Loading,
    /// Rendered list (or the empty-state placeholder).
    Ready { markup: String, count: usize },
    /// The last fetch failed; shows the load-error placeholder.
    LoadFailed { markup: String },
}

impl SitesPanel {
    /// The container's markup.
    pub fn markup(&self) -> String {
        match self {
            Self::Loading => render::render_loading(),
            Self::Ready { markup, .. } | Self::LoadFailed { markup } => markup.clone(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::LoadFailed { .. })
    }
}

/// Snapshot of the rendered dashboard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardView {
    pub sites: SitesPanel,
    /// Last successfully fetched stats. Kept on screen when a later fetch
    /// fails.
    pub stats: Option<Stats>,
    /// When a panel was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl DashboardView {
    /// Markup of the stats panel.
    pub fn stats_markup(&self) -> String {
        render::render_stats(self.stats.as_ref())
    }
}
