// ── Controller context ──
//
// The capability bundle every controller is built from: the HTTP client,
// the session, and the configured page size. Cloning is cheap.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use shelfy_api::ShelfClient;
use shelfy_api::types::{LoginRequest, RegisterRequest};
use tracing::{debug, info};

use crate::config::{ClientConfig, DEFAULT_PAGE_SIZE};
use crate::error::CoreError;
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct Context {
    api: Arc<ShelfClient>,
    session: Session,
    page_size: u32,
}

impl Context {
    /// Build the HTTP client from `config` and bind it to `session`.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, CoreError> {
        let api = config.build_client()?;
        Ok(Self::from_client(api, session, config.page_size))
    }

    pub fn from_client(api: ShelfClient, session: Session, page_size: u32) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        Self {
            api: Arc::new(api),
            session,
            page_size,
        }
    }

    /// Same client and session, different list page size.
    pub fn with_page_size(&self, page_size: u32) -> Self {
        Self {
            api: Arc::clone(&self.api),
            session: self.session.clone(),
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    pub fn api(&self) -> &ShelfClient {
        &self.api
    }

    pub(crate) fn api_handle(&self) -> Arc<ShelfClient> {
        Arc::clone(&self.api)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The token for an outgoing request, or `Unauthenticated`.
    pub fn token(&self) -> Result<SecretString, CoreError> {
        self.session.token().ok_or(CoreError::Unauthenticated)
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Exchange credentials for a token and install it in the session.
    ///
    /// Returns the token so the caller can persist it.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SecretString, CoreError> {
        debug!(email, "logging in");
        let request = LoginRequest {
            email: email.to_owned(),
            password: password.expose_secret().to_owned(),
        };
        let response = self.api.login(&request).await?;
        if response.token.trim().is_empty() {
            return Err(CoreError::AuthenticationFailed {
                message: "server returned an empty token".into(),
            });
        }

        let token = SecretString::from(response.token);
        self.session.login(token.clone());
        info!(email, "logged in");
        Ok(token)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), CoreError> {
        let request = RegisterRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.expose_secret().to_owned(),
        };
        self.api.register(&request).await?;
        info!(email, "account registered");
        Ok(())
    }

    pub fn logout(&self) {
        self.session.logout();
    }
}
