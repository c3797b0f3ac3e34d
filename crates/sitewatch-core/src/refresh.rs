// ── Refresh cycle bookkeeping ──
//
// Cycles from the poller and from operator actions can interleave. Each
// cycle takes a generation number when it starts; when its responses
// land, a panel only accepts them if no later cycle has already written
// to it. The last cycle *issued* wins, not the last one to finish.

use std::sync::atomic::{AtomicU64, Ordering};

/// What happened to one panel (sites or stats) during a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelOutcome {
    /// The response was applied and rendered.
    Applied,
    /// The fetch failed; the panel shows its degraded state.
    Failed,
    /// A newer cycle already updated the panel; this response was dropped.
    Stale,
}

/// Summary of a single refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub generation: u64,
    pub sites: PanelOutcome,
    pub stats: PanelOutcome,
}

impl RefreshOutcome {
    /// `true` when both panels were refreshed from this cycle.
    pub fn is_complete(&self) -> bool {
        self.sites == PanelOutcome::Applied && self.stats == PanelOutcome::Applied
    }
}

/// Generation counters shared by all refresh cycles of one dashboard.
#[derive(Debug, Default)]
pub(crate) struct RefreshGuard {
    issued: AtomicU64,
    sites_applied: AtomicU64,
    stats_applied: AtomicU64,
}

impl RefreshGuard {
    /// Start a cycle, returning its generation (1-based, strictly increasing).
    pub(crate) fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Claim the sites panel for `generation`. Returns `false` if a newer
    /// cycle got there first.
    pub(crate) fn admit_sites(&self, generation: u64) -> bool {
        admit(&self.sites_applied, generation)
    }

    /// Claim the stats panel for `generation`.
    pub(crate) fn admit_stats(&self, generation: u64) -> bool {
        admit(&self.stats_applied, generation)
    }
}

fn admit(slot: &AtomicU64, generation: u64) -> bool {
    slot.fetch_max(generation, Ordering::SeqCst) < generation
}
