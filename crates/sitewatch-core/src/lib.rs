//! Client-side state synchronization for the sitewatch dashboard.
//!
//! One refresh loop, several entry points:
//!
//! - **[`Dashboard`]**: Facade owning the [`SiteClient`](sitewatch_api::SiteClient),
//!   the [`StateStore`] and the published [`DashboardView`]. Its
//!   [`refresh()`](Dashboard::refresh) is the single refresh cycle: fetch
//!   sites and stats concurrently, replace the store, re-render, publish.
//!
//! - **[`Poller`]**: Drives `refresh()` on a fixed cadence (`Idle` →
//!   `Active` once, cancellable through [`Poller::stop`]).
//!
//! - **[`ActionDispatcher`]**: Operator mutations (add / delete /
//!   check-now), each followed by a forced refresh. Confirmation and
//!   notification go through the [`Operator`] trait.
//!
//! - **[`ModalController`]**: Visibility state machine and form fields of
//!   the add-site dialog.
//!
//! - **Rendering** ([`render`], [`escape`]): Pure projection from state to
//!   HTML markup. Every user-supplied string is escaped.

pub mod config;
pub mod dashboard;
pub mod dispatch;
pub mod error;
pub mod escape;
pub mod modal;
pub mod model;
pub mod poller;
pub mod refresh;
pub mod render;
pub mod store;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_REFRESH_INTERVAL, DashboardConfig};
pub use dashboard::Dashboard;
pub use dispatch::{ActionDispatcher, Operator};
pub use error::CoreError;
pub use escape::escape_html;
pub use modal::{AddSiteForm, ModalController, ModalState};
pub use model::{CreatedSite, RecentCheck, Site, SiteStatus, Stats};
pub use poller::{Poller, PollerState};
pub use refresh::{PanelOutcome, RefreshOutcome};
pub use render::RenderOptions;
pub use store::StateStore;
pub use view::{DashboardView, SitesPanel};
