// ── Core error types ──
//
// User-facing errors from shelfy-core. Consumers never see reqwest or
// JSON parse failures directly. The `From<shelfy_api::Error>` impl
// translates transport-layer errors into domain variants.
//
// Every payload is a plain string so errors can be cloned into UI
// actions and stored on controllers.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Not logged in")]
    Unauthenticated,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("{message}")]
    Validation { field: String, message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    /// Non-2xx response; `message` is the server's `message` field.
    #[error("API error{}: {}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default(), message.as_deref().unwrap_or("no message"))]
    Api {
        status: Option<u16>,
        message: Option<String>,
    },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("{operation} already in progress")]
    InProgress { operation: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deletion was not confirmed")]
    NotConfirmed,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_owned(),
            message: message.into(),
        }
    }

    /// Message to show inline: the server's own message when it sent one,
    /// otherwise `default`.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            }
            | Self::AuthenticationFailed { message }
            | Self::Validation { message, .. } => message.clone(),
            Self::Unauthenticated => self.to_string(),
            _ => default.to_owned(),
        }
    }

    /// Returns `true` for 404 responses and client-side lookups that missed.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Api {
                status: Some(404),
                ..
            }
        )
    }

    /// Returns `true` when logging in again may resolve the error.
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::AuthenticationFailed { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<shelfy_api::Error> for CoreError {
    fn from(err: shelfy_api::Error) -> Self {
        match err {
            shelfy_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            shelfy_api::Error::InvalidToken(reason) => CoreError::AuthenticationFailed {
                message: format!("stored token is not usable: {reason}"),
            },
            shelfy_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        status: e.status().map(|s| s.as_u16()),
                        message: None,
                    }
                }
            }
            shelfy_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            shelfy_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            shelfy_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            shelfy_api::Error::Api { status, message } => CoreError::Api {
                status: Some(status),
                message,
            },
            shelfy_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_text() {
        let err = CoreError::Api {
            status: Some(409),
            message: Some("Category in use".into()),
        };
        assert_eq!(err.user_message("Failed to delete category"), "Category in use");
    }

    #[test]
    fn user_message_falls_back_without_server_text() {
        let err = CoreError::Api {
            status: Some(500),
            message: None,
        };
        assert_eq!(
            err.user_message("An error occurred while saving the book"),
            "An error occurred while saving the book"
        );

        let err = CoreError::ConnectionFailed {
            url: "http://x".into(),
            reason: "refused".into(),
        };
        assert_eq!(err.user_message("Failed to delete book"), "Failed to delete book");
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = CoreError::validation("title", "Title is required");
        assert_eq!(err.user_message("ignored"), "Title is required");
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn api_404_maps_to_not_found() {
        let err = CoreError::from(shelfy_api::Error::Api {
            status: 404,
            message: None,
        });
        assert!(err.is_not_found());
    }
}
