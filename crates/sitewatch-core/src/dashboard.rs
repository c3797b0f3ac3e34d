// ── Dashboard facade ──
//
// Owns the backend client, the state store, and the published view.
// `refresh()` is the one refresh cycle every entry point (poller,
// operator actions, manual refresh) converges on.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, warn};

use sitewatch_api::{SiteClient, TransportConfig};

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::model::{Site, Stats};
use crate::refresh::{PanelOutcome, RefreshGuard, RefreshOutcome};
use crate::render;
use crate::store::StateStore;
use crate::view::{DashboardView, SitesPanel};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<DashboardInner>`; the poller and the action
/// dispatcher each hold a clone of the same dashboard.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    client: SiteClient,
    store: StateStore,
    view: watch::Sender<DashboardView>,
    guard: RefreshGuard,
}

impl Dashboard {
    /// Create a dashboard from configuration. Does NOT fetch anything;
    /// start a [`Poller`](crate::Poller) or call [`refresh()`](Self::refresh).
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = SiteClient::new(config.server.clone(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Create a dashboard around an existing client.
    pub fn with_client(config: DashboardConfig, client: SiteClient) -> Self {
        let (view, _) = watch::channel(DashboardView::default());
        Self {
            inner: Arc::new(DashboardInner {
                config,
                client,
                store: StateStore::new(),
                view,
                guard: RefreshGuard::default(),
            }),
        }
    }

    /// Access the dashboard configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Access the backend client.
    pub fn client(&self) -> &SiteClient {
        &self.inner.client
    }

    /// Access the state store.
    pub fn store(&self) -> &StateStore {
        &self.inner.store
    }

    // ── View observation ─────────────────────────────────────────

    /// Subscribe to view updates.
    pub fn view(&self) -> watch::Receiver<DashboardView> {
        self.inner.view.subscribe()
    }

    /// The current view.
    pub fn view_snapshot(&self) -> DashboardView {
        self.inner.view.borrow().clone()
    }

    /// The current site list.
    pub fn sites_snapshot(&self) -> Arc<Vec<Site>> {
        self.inner.store.current()
    }

    // ── Refresh cycle ────────────────────────────────────────────

    /// Run one refresh cycle: fetch sites and stats concurrently, then
    /// apply each panel.
    ///
    /// Never fails. A sites failure swaps the list for the load-error
    /// placeholder and leaves the store untouched; a stats failure keeps
    /// the previous counters. Everything after the fetches is synchronous,
    /// so a cycle's render cannot interleave with another cycle's.
    pub async fn refresh(&self) -> RefreshOutcome {
        let client = &self.inner.client;
        let generation = self.inner.guard.begin();
        debug!(generation, "refresh cycle started");

        let (sites_res, stats_res) = tokio::join!(client.list_sites(), client.fetch_stats());

        let sites = self.apply_sites(generation, sites_res.map_err(CoreError::from));
        let stats = self.apply_stats(generation, stats_res.map_err(CoreError::from));

        debug!(generation, ?sites, ?stats, "refresh cycle finished");
        RefreshOutcome {
            generation,
            sites,
            stats,
        }
    }

    fn apply_sites(&self, generation: u64, result: Result<Vec<Site>, CoreError>) -> PanelOutcome {
        if !self.inner.guard.admit_sites(generation) {
            debug!(generation, "dropping stale site list");
            return PanelOutcome::Stale;
        }

        match result {
            Ok(sites) => {
                self.inner.store.replace(sites);
                let current = self.inner.store.current();
                let markup = render::render_sites(&current, &self.inner.config.render);
                let count = current.len();
                self.inner.view.send_modify(|view| {
                    view.sites = SitesPanel::Ready { markup, count };
                    view.updated_at = Some(Utc::now());
                });
                PanelOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "failed to load sites");
                self.inner.view.send_modify(|view| {
                    view.sites = SitesPanel::LoadFailed {
                        markup: render::render_load_error(),
                    };
                });
                PanelOutcome::Failed
            }
        }
    }

    fn apply_stats(&self, generation: u64, result: Result<Stats, CoreError>) -> PanelOutcome {
        if !self.inner.guard.admit_stats(generation) {
            debug!(generation, "dropping stale stats");
            return PanelOutcome::Stale;
        }

        match result {
            Ok(stats) => {
                self.inner.view.send_modify(|view| {
                    view.stats = Some(stats);
                    view.updated_at = Some(Utc::now());
                });
                PanelOutcome::Applied
            }
            Err(e) => {
                // Previous counters stay on screen.
                warn!(error = %e, "failed to load stats");
                PanelOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn offline_dashboard() -> Dashboard {
        let config = DashboardConfig::new("http://127.0.0.1:9".parse().unwrap());
        Dashboard::new(config).unwrap()
    }

    fn site(id: i64) -> Site {
        Site {
            id,
            url: format!("https://{id}.test"),
            name: None,
            is_up: Some(true),
            last_check: None,
            consecutive_failures: 0,
        }
    }

    #[test]
    fn new_dashboard_is_loading_and_empty() {
        let dash = offline_dashboard();
        assert_eq!(dash.view_snapshot().sites, SitesPanel::Loading);
        assert!(dash.sites_snapshot().is_empty());
    }

    #[test]
    fn sites_failure_keeps_store_and_shows_placeholder() {
        let dash = offline_dashboard();
        let generation = dash.inner.guard.begin();
        assert_eq!(
            dash.apply_sites(generation, Ok(vec![site(1), site(2)])),
            PanelOutcome::Applied
        );

        let generation = dash.inner.guard.begin();
        let outcome = dash.apply_sites(
            generation,
            Err(CoreError::Network {
                message: "refused".into(),
                status: None,
            }),
        );

        assert_eq!(outcome, PanelOutcome::Failed);
        assert_eq!(dash.sites_snapshot().len(), 2);
        assert!(dash.view_snapshot().sites.is_failed());
    }

    #[test]
    fn stats_failure_keeps_previous_counters() {
        let dash = offline_dashboard();
        let stats = Stats {
            total_sites: 2,
            up_sites: 2,
            down_sites: 0,
            recent_checks: Vec::new(),
        };
        let generation = dash.inner.guard.begin();
        dash.apply_stats(generation, Ok(stats.clone()));

        let generation = dash.inner.guard.begin();
        let outcome = dash.apply_stats(
            generation,
            Err(CoreError::Network {
                message: "timeout".into(),
                status: None,
            }),
        );

        assert_eq!(outcome, PanelOutcome::Failed);
        assert_eq!(dash.view_snapshot().stats, Some(stats));
    }

    #[test]
    fn stale_site_list_is_discarded() {
        let dash = offline_dashboard();
        let older = dash.inner.guard.begin();
        let newer = dash.inner.guard.begin();

        assert_eq!(dash.apply_sites(newer, Ok(vec![site(2)])), PanelOutcome::Applied);
        assert_eq!(
            dash.apply_sites(older, Ok(vec![site(1), site(3)])),
            PanelOutcome::Stale
        );
        assert_eq!(*dash.sites_snapshot(), vec![site(2)]);
    }

    #[tokio::test]
    async fn refresh_against_unreachable_backend_degrades() {
        let dash = offline_dashboard();
        let outcome = dash.refresh().await;

        assert_eq!(outcome.sites, PanelOutcome::Failed);
        assert_eq!(outcome.stats, PanelOutcome::Failed);
        assert!(dash.view_snapshot().sites.is_failed());
        assert_eq!(dash.view_snapshot().stats, None);
    }
}
