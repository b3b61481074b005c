//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use mistly_config::ConfigError;
use mistly_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const RATE_LIMITED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the Mist API at {host}")]
    #[diagnostic(
        code(mistly::connection_failed),
        help(
            "Check network connectivity and the API host.\n\
             Regional clouds use different hosts, e.g. api.eu.mist.com.\n\
             Try: mistly orgs list --host api.mist.com"
        )
    )]
    ConnectionFailed {
        host: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(mistly::auth_failed),
        help(
            "The API token was rejected. Tokens are created under\n\
             My Account > API Tokens in the Mist dashboard.\n\
             Run: mistly config set-token"
        )
    )]
    AuthFailed,

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(mistly::no_credentials),
        help(
            "Configure a token with: mistly config init\n\
             Or set the MIST_API_TOKEN environment variable\n\
             (comma-separate multiple tokens)."
        )
    )]
    NoCredentials { profile: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(mistly::permission_denied),
        help("The token lacks privileges for this organization or endpoint.")
    )]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Organization '{identifier}' not found")]
    #[diagnostic(
        code(mistly::not_found),
        help("Run: mistly orgs list to see accessible organizations")
    )]
    OrgNotFound { identifier: String },

    #[error("No organizations reachable through {tokens} configured token(s)")]
    #[diagnostic(
        code(mistly::no_organizations),
        help(
            "Every token failed or carries no org privileges.\n\
             Check token validity with: mistly orgs list -v"
        )
    )]
    NoOrganizations { tokens: usize },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Rate limited by the Mist API (retry after {retry_after_secs}s)")]
    #[diagnostic(
        code(mistly::rate_limited),
        help("The API allows 5000 requests per hour per token. Wait and retry.")
    )]
    RateLimited { retry_after_secs: u64 },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(mistly::api_error))]
    ApiError { status: u16, message: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out")]
    #[diagnostic(
        code(mistly::timeout),
        help("Increase the timeout with --timeout or check API responsiveness.")
    )]
    Timeout,

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mistly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mistly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mistly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(mistly::config))]
    Config(String),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(mistly::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::OrgNotFound { .. } | Self::NoOrganizations { .. } => exit_code::NOT_FOUND,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::RateLimited { .. } => exit_code::RATE_LIMITED,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── mistly_api::Error → CliError mapping ─────────────────────────────

impl From<mistly_api::Error> for CliError {
    fn from(err: mistly_api::Error) -> Self {
        match err {
            mistly_api::Error::Authentication { .. } => Self::AuthFailed,

            mistly_api::Error::PermissionDenied { message } => {
                Self::PermissionDenied { message }
            }

            mistly_api::Error::RateLimited { retry_after_secs } => {
                Self::RateLimited { retry_after_secs }
            }

            mistly_api::Error::Api { status: 404, message } => Self::OrgNotFound {
                identifier: message,
            },

            mistly_api::Error::Api { status, message } => Self::ApiError { status, message },

            mistly_api::Error::Transport(source) => {
                if source.is_timeout() {
                    Self::Timeout
                } else {
                    Self::ConnectionFailed {
                        host: source
                            .url()
                            .and_then(|u| u.host_str())
                            .unwrap_or("(unknown)")
                            .to_owned(),
                        source: source.into(),
                    }
                }
            }

            mistly_api::Error::InvalidHost(host) => Self::Validation {
                field: "host".into(),
                reason: format!("invalid API host: {host}"),
            },

            mistly_api::Error::InvalidUrl(err) => Self::Validation {
                field: "host".into(),
                reason: err.to_string(),
            },

            mistly_api::Error::Tls(message) => Self::ConnectionFailed {
                host: "(tls)".into(),
                source: message.into(),
            },

            mistly_api::Error::Deserialization { message, .. } => Self::ApiError {
                status: 0,
                message: format!("unexpected response body: {message}"),
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(inner) => inner.into(),

            CoreError::NoOrganizations { tokens } => Self::NoOrganizations { tokens },

            CoreError::InvalidPurchased { spec, reason } => Self::Validation {
                field: "purchased".into(),
                reason: format!("{spec}: {reason}"),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },

            ConfigError::UnknownProfile { profile } => Self::ProfileNotFound {
                name: profile,
                available: String::new(),
            },

            ConfigError::Validation { field, reason } => Self::Validation { field, reason },

            other => Self::Config(other.to_string()),
        }
    }
}
