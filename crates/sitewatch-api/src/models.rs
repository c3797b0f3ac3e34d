// Backend wire types
//
// Models for the monitoring backend's JSON API. Fields the backend may
// omit or send as `null` use `#[serde(default)]` so a partially populated
// site (one that was never checked) still decodes.

use serde::{Deserialize, Serialize};

// ── Site ─────────────────────────────────────────────────────────────

/// A monitored site as returned by `GET /api/sites`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Server-assigned identifier, unique and immutable.
    pub id: i64,
    pub url: String,
    /// Optional display label. The backend stores an empty string when
    /// the operator left it blank.
    #[serde(default)]
    pub name: Option<String>,
    /// `None` until the monitoring engine has checked the site once.
    #[serde(default)]
    pub is_up: Option<bool>,
    /// Raw timestamp of the last check, as the backend formats it.
    #[serde(default)]
    pub last_check: Option<String>,
    #[serde(default)]
    pub consecutive_failures: u32,
}

impl Site {
    /// The label shown to the operator: the name when set, otherwise the url.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.url)
    }
}

// ── Stats ────────────────────────────────────────────────────────────

/// Aggregate counters from `GET /api/stats`.
///
/// Derived entirely server-side; the client never recomputes them from
/// the site list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_sites: u64,
    pub up_sites: u64,
    pub down_sites: u64,
    /// Most recent checks across all sites, newest first.
    #[serde(default)]
    pub recent_checks: Vec<RecentCheck>,
}

/// One entry of the backend's recent-check log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCheck {
    pub url: String,
    pub is_up: bool,
    #[serde(default)]
    pub checked_at: Option<String>,
    /// Response time in seconds.
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

// ── Create ───────────────────────────────────────────────────────────

/// Body of `POST /api/sites`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSiteRequest {
    pub url: String,
    pub name: String,
}

/// Successful response to `POST /api/sites`.
///
/// Backends either echo the created site or acknowledge with its id:
/// ```json
/// { "success": true, "site_id": 7 }
/// ```
/// Any other 2xx body still means the site was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedSite {
    Site(Site),
    Ack {
        site_id: i64,
        #[serde(default)]
        success: bool,
    },
    #[serde(skip_deserializing)]
    Accepted,
}

impl CreatedSite {
    /// Id of the newly created site, when the backend reported one.
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Site(site) => Some(site.id),
            Self::Ack { site_id, .. } => Some(*site_id),
            Self::Accepted => None,
        }
    }
}

// ── Error body ───────────────────────────────────────────────────────

/// Structured error body on non-2xx responses.
///
/// The documented field is `error`; FastAPI-style backends send `detail`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The operator-facing message, if the body carried a usable one.
    pub(crate) fn into_message(self) -> Option<String> {
        if let Some(msg) = self.error.filter(|m| !m.trim().is_empty()) {
            return Some(msg);
        }
        match self.detail? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }
}
