// ── Core error types ──
//
// The failure classes the dashboard distinguishes. Transport
// details are folded into `Network`; only a message the backend wrote
// for the operator survives as `Validation`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Transport failure, non-2xx without a usable body, or an
    /// undecodable response.
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// HTTP status code (if a response was received).
        status: Option<u16>,
    },

    /// The backend (or a local precondition) rejected the input. The
    /// message is operator-facing and shown verbatim.
    #[error("{message}")]
    Validation {
        message: String,
        /// HTTP status of the rejection; `None` for local checks.
        status: Option<u16>,
    },

    /// The operator declined a confirmation.
    #[error("Cancelled by operator")]
    UserAbort,

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The message to show the operator: the server's text for
    /// validation failures, `fallback` for everything else.
    pub fn operator_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            _ => fallback.to_owned(),
        }
    }

    pub fn is_user_abort(&self) -> bool {
        matches!(self, Self::UserAbort)
    }

    /// HTTP status code, if the failure came from a backend response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } | Self::Validation { status, .. } => *status,
            Self::UserAbort | Self::Config { .. } => None,
        }
    }

    /// Whether the backend answered 404, with or without a message.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sitewatch_api::Error> for CoreError {
    fn from(err: sitewatch_api::Error) -> Self {
        match err {
            sitewatch_api::Error::Rejected { status, message } => CoreError::Validation {
                message,
                status: Some(status),
            },
            sitewatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid backend URL: {e}"),
            },
            sitewatch_api::Error::ClientBuild(message) => CoreError::Config { message },
            other => CoreError::Network {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}
