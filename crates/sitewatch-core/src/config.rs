// ── Runtime dashboard configuration ──
//
// Describes which backend to talk to and how often. Built by the CLI
// from its config file and flags; core never reads files itself.

use std::time::Duration;

use url::Url;

use crate::render::RenderOptions;

/// Reference refresh cadence.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Default transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a single dashboard instance.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend base URL (e.g., `http://localhost:5000`).
    pub server: Url,
    /// Request timeout, enforced by the transport.
    pub timeout: Duration,
    /// Poller cadence.
    pub refresh_interval: Duration,
    /// Viewer locale for rendering.
    pub render: RenderOptions,
}

impl DashboardConfig {
    /// Configuration with default cadence, timeout, and rendering.
    pub fn new(server: Url) -> Self {
        Self {
            server,
            timeout: DEFAULT_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            render: RenderOptions::default(),
        }
    }
}
