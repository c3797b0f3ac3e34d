//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sitewatch_config::ConfigError;
use sitewatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the monitoring backend: {message}")]
    #[diagnostic(
        code(sitewatch::network),
        help(
            "Check that the backend is running and reachable.\n\
             Try: sitewatch --server http://localhost:5000 sites list"
        )
    )]
    Network { message: String },

    #[error("Monitoring backend failed the request: {message}")]
    #[diagnostic(
        code(sitewatch::backend),
        help("The backend answered HTTP {status}; check its logs.")
    )]
    Backend { status: u16, message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Site {id} not found")]
    #[diagnostic(
        code(sitewatch::not_found),
        help("Run: sitewatch sites list to see monitored sites")
    )]
    NotFound { id: i64 },

    // ── Backend rejection ────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(sitewatch::rejected))]
    Rejected { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sitewatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sitewatch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sitewatch config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(sitewatch::no_config),
        help(
            "Create a profile with: sitewatch config init\n\
             Or pass --server (SITEWATCH_SERVER).\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(sitewatch::config))]
    Config(Box<figment::Error>),

    #[error("Failed to write configuration: {0}")]
    #[diagnostic(code(sitewatch::config_write))]
    ConfigWrite(String),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Cancelled")]
    #[diagnostic(code(sitewatch::aborted))]
    Aborted,

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(sitewatch::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(sitewatch::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Network { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Like `From<CoreError>`, but a 404 on a site-scoped call becomes
    /// [`CliError::NotFound`].
    pub fn for_site(err: CoreError, id: i64) -> Self {
        if err.is_not_found() {
            return Self::NotFound { id };
        }
        err.into()
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Network {
                message,
                status: Some(status),
            } => CliError::Backend { status, message },
            CoreError::Network { message, .. } => CliError::Network { message },
            CoreError::Validation { message, .. } => CliError::Rejected { message },
            CoreError::UserAbort => CliError::Aborted,
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Serialization(e) => CliError::ConfigWrite(e.to_string()),
        }
    }
}
