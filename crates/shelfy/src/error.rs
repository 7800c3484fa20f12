//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a distinct exit code per kind.

use miette::Diagnostic;
use thiserror::Error;

use shelfy_config::ConfigError;
use shelfy_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const VALIDATION: i32 = 5;
    pub const API: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CONFIG: i32 = 9;
    pub const CANCELLED: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to server at {url}")]
    #[diagnostic(
        code(shelfy::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(shelfy::timeout),
        help("Increase the timeout with --timeout or check the server.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not logged in (profile '{profile}')")]
    #[diagnostic(
        code(shelfy::not_logged_in),
        help(
            "Run: shelfy login --profile {profile}\n\
             Or pass a token with --token / SHELFY_TOKEN."
        )
    )]
    NotLoggedIn { profile: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(shelfy::auth_failed),
        help("The token may have expired. Run: shelfy login")
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(shelfy::not_found),
        help("Run: shelfy {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(shelfy::api_error))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shelfy::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(shelfy::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: shelfy config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No server configured")]
    #[diagnostic(
        code(shelfy::no_config),
        help(
            "Create a profile with: shelfy config init\n\
             Or pass --server / SHELFY_SERVER.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(shelfy::config))]
    Config(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(shelfy::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Operation cancelled")]
    #[diagnostic(code(shelfy::cancelled))]
    Cancelled,

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(shelfy::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotLoggedIn { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ApiError { .. } => exit_code::API,
            Self::Validation { .. } => exit_code::VALIDATION,
            Self::ProfileNotFound { .. } | Self::NoConfig { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Cancelled => exit_code::CANCELLED,
            Self::Io(_) | Self::Internal(_) => exit_code::GENERAL,
        }
    }

    /// Attach a resource name to a bare 404 so the help text can point
    /// at the right list command.
    pub fn for_resource(self, resource_type: &str, identifier: impl ToString) -> Self {
        match self {
            Self::ApiError {
                status: Some(404), ..
            }
            | Self::NotFound { .. } => Self::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.to_string(),
                list_command: format!("{resource_type} list"),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Unauthenticated => Self::NotLoggedIn {
                profile: "current".into(),
            },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: format!("{entity_type} list"),
                resource_type: entity_type,
                identifier,
            },
            CoreError::Validation { field, message } => Self::Validation {
                field,
                reason: message,
            },
            CoreError::Api { status, message } => Self::ApiError {
                status,
                message: message.unwrap_or_else(|| match status {
                    Some(code) => format!("server returned HTTP {code}"),
                    None => "request failed".into(),
                }),
            },
            CoreError::InProgress { operation } => Self::Internal(format!("{operation} already running")),
            CoreError::Cancelled | CoreError::NotConfirmed => Self::Cancelled,
            CoreError::Config { message } => Self::Config(message),
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: available_profiles(),
            },
            ConfigError::NoCredentials { profile } => Self::NotLoggedIn { profile },
            other => Self::Config(other.to_string()),
        }
    }
}

fn available_profiles() -> String {
    let cfg = shelfy_config::load_config_or_default();
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        assert_eq!(CliError::from(CoreError::Unauthenticated).exit_code(), 3);
        assert_eq!(
            CliError::from(CoreError::Timeout { timeout_secs: 5 }).exit_code(),
            8
        );
        assert_eq!(
            CliError::from(CoreError::Api {
                status: Some(409),
                message: Some("Category in use".into()),
            })
            .exit_code(),
            6
        );
        assert_eq!(CliError::from(CoreError::Cancelled).exit_code(), 10);
    }

    #[test]
    fn bare_404_becomes_not_found() {
        let err = CliError::from(CoreError::Api {
            status: Some(404),
            message: None,
        })
        .for_resource("books", 12);
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.to_string(), "books '12' not found");
    }

    #[test]
    fn api_error_prefers_server_message() {
        let err = CliError::from(CoreError::Api {
            status: Some(422),
            message: Some("Title taken".into()),
        });
        assert_eq!(err.to_string(), "Title taken");
    }
}
