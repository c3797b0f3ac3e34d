// ── Client state store ──
//
// Holds the last site list received from the backend. Replacement is the
// only mutation; subscribers see whole snapshots, never a merge.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::Site;

/// Single holder of the client's site list.
///
/// Backed by a `watch` channel so the snapshot can be shared cheaply and
/// observed reactively. Every [`replace`](Self::replace) swaps the whole
/// sequence; there is no by-id index and no partial update.
pub struct StateStore {
    sites: watch::Sender<Arc<Vec<Site>>>,
    version: watch::Sender<u64>,
}

impl StateStore {
    pub fn new() -> Self {
        let (sites, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0u64);
        Self { sites, version }
    }

    /// Discard the previous list and install `sites` in server order.
    pub fn replace(&self, sites: Vec<Site>) {
        // `send_replace` updates unconditionally, even with zero receivers.
        self.sites.send_replace(Arc::new(sites));
        self.version.send_modify(|v| *v += 1);
    }

    /// The current list (cheap `Arc` clone).
    pub fn current(&self) -> Arc<Vec<Site>> {
        self.sites.borrow().clone()
    }

    /// Number of replacements applied so far.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Site>>> {
        self.sites.subscribe()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
