// ── Domain model ──
//
// Wire types are used as-is; the client never reshapes what the backend
// sent. `SiteStatus` is the only derived value.

pub use sitewatch_api::{CreatedSite, RecentCheck, Site, Stats};

use serde::Serialize;
use strum::{AsRefStr, Display};

/// Tri-state availability of a site.
///
/// `Unknown` means "never checked", which is distinct from a failed check.
/// The `AsRefStr` form is the CSS class used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    Up,
    Down,
    Unknown,
}

impl SiteStatus {
    /// Operator-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "Доступен",
            Self::Down => "Недоступен",
            Self::Unknown => "Не проверен",
        }
    }
}

impl From<Option<bool>> for SiteStatus {
    fn from(is_up: Option<bool>) -> Self {
        match is_up {
            Some(true) => Self::Up,
            Some(false) => Self::Down,
            None => Self::Unknown,
        }
    }
}

impl From<&Site> for SiteStatus {
    fn from(site: &Site) -> Self {
        Self::from(site.is_up)
    }
}
