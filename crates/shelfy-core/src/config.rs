// ── Runtime client configuration ──
//
// Describes *how* to reach the book-collection server. Carries no
// credentials and never touches disk: the CLI/TUI builds a
// `ClientConfig` from a profile and hands it in.

use std::time::Duration;

use shelfy_api::{ShelfClient, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// Page size the list screens request when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local development servers).
    DangerAcceptInvalid,
}

/// Everything needed to build an HTTP client for one server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// `limit` sent with every paged list request.
    pub page_size: u32,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    /// Build the HTTP client for this server.
    pub fn build_client(&self) -> Result<ShelfClient, CoreError> {
        ShelfClient::new(self.base_url.as_str(), &self.transport()).map_err(|e| {
            CoreError::ConnectionFailed {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            }
        })
    }
}
