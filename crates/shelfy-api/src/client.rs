// Async HTTP client for the book-collection REST API.
//
// Base path: /api/
// Auth: `Authorization: Bearer <token>` attached per request, so a single
// client survives login/logout cycles.

use std::time::Duration;

use reqwest::RequestBuilder;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{
    BookPayload, BookResponse, CategoryPayload, CategoryResponse, ErrorBody, LoginRequest,
    LoginResponse, PageParams, RegisterRequest, ReviewPayload, ReviewResponse,
};

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the book-collection API.
///
/// Cheap to share behind an `Arc`; holds no session state of its own.
#[derive(Debug, Clone)]
pub struct ShelfClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ShelfClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http, transport.timeout)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    /// Ensure the base path ends with `/` so relative joins keep any prefix.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"api/books"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(builder: RequestBuilder, token: &SecretString) -> Result<RequestBuilder, Error> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);
        Ok(builder.header(AUTHORIZATION, value))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, Error> {
        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                Error::Transport(e)
            }
        })
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<PageParams>,
        token: &SecretString,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let mut builder = self.http.get(url);
        if let Some(params) = params {
            builder = builder.query(&params.to_query());
        }
        let resp = self.send(Self::authorize(builder, token)?).await?;
        Self::handle_response(resp).await
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: &SecretString,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let builder = Self::authorize(self.http.post(url).json(body), token)?;
        let resp = self.send(builder).await?;
        Self::handle_empty(resp).await
    }

    async fn post_public<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(body)).await?;
        Self::handle_response(resp).await
    }

    async fn put<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: &SecretString,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let builder = Self::authorize(self.http.put(url).json(body), token)?;
        let resp = self.send(builder).await?;
        Self::handle_empty(resp).await
    }

    async fn delete(&self, path: &str, token: &SecretString) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let builder = Self::authorize(self.http.delete(url), token)?;
        let resp = self.send(builder).await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty());

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: message.unwrap_or_else(|| "token rejected by server".into()),
            };
        }

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Auth ─────────────────────────────────────────────────────────

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, Error> {
        self.post_public("api/auth/login", request).await
    }

    /// Create an account. The response body is ignored; callers log in
    /// afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), Error> {
        let url = self.url("api/auth/register")?;
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(request)).await?;
        Self::handle_empty(resp).await
    }

    // ── Books ────────────────────────────────────────────────────────

    /// `GET /api/books`. Without `params` the server returns its default
    /// listing (used for option lists).
    pub async fn list_books(
        &self,
        token: &SecretString,
        params: Option<PageParams>,
    ) -> Result<Vec<BookResponse>, Error> {
        self.get("api/books", params, token).await
    }

    pub async fn get_book(&self, token: &SecretString, id: u64) -> Result<BookResponse, Error> {
        self.get(&format!("api/books/{id}"), None, token).await
    }

    pub async fn create_book(&self, token: &SecretString, body: &BookPayload) -> Result<(), Error> {
        self.post("api/books", body, token).await
    }

    pub async fn update_book(
        &self,
        token: &SecretString,
        id: u64,
        body: &BookPayload,
    ) -> Result<(), Error> {
        self.put(&format!("api/books/{id}"), body, token).await
    }

    pub async fn delete_book(&self, token: &SecretString, id: u64) -> Result<(), Error> {
        self.delete(&format!("api/books/{id}"), token).await
    }

    // ── Categories ───────────────────────────────────────────────────

    pub async fn list_categories(
        &self,
        token: &SecretString,
        params: Option<PageParams>,
    ) -> Result<Vec<CategoryResponse>, Error> {
        self.get("api/category", params, token).await
    }

    pub async fn get_category(
        &self,
        token: &SecretString,
        id: u64,
    ) -> Result<CategoryResponse, Error> {
        self.get(&format!("api/category/{id}"), None, token).await
    }

    pub async fn create_category(
        &self,
        token: &SecretString,
        body: &CategoryPayload,
    ) -> Result<(), Error> {
        self.post("api/category", body, token).await
    }

    pub async fn update_category(
        &self,
        token: &SecretString,
        id: u64,
        body: &CategoryPayload,
    ) -> Result<(), Error> {
        self.put(&format!("api/category/{id}"), body, token).await
    }

    pub async fn delete_category(&self, token: &SecretString, id: u64) -> Result<(), Error> {
        self.delete(&format!("api/category/{id}"), token).await
    }

    // ── Reviews ──────────────────────────────────────────────────────

    /// All reviews visible to the current user.
    pub async fn list_reviews(
        &self,
        token: &SecretString,
        params: Option<PageParams>,
    ) -> Result<Vec<ReviewResponse>, Error> {
        self.get("api/review", params, token).await
    }

    /// Reviews for a single book.
    pub async fn list_book_reviews(
        &self,
        token: &SecretString,
        book_id: u64,
        params: Option<PageParams>,
    ) -> Result<Vec<ReviewResponse>, Error> {
        self.get(&format!("api/review/book/{book_id}"), params, token)
            .await
    }

    pub async fn create_review(
        &self,
        token: &SecretString,
        body: &ReviewPayload,
    ) -> Result<(), Error> {
        self.post("api/review", body, token).await
    }

    pub async fn update_review(
        &self,
        token: &SecretString,
        id: u64,
        body: &ReviewPayload,
    ) -> Result<(), Error> {
        self.put(&format!("api/review/{id}"), body, token).await
    }

    pub async fn delete_review(&self, token: &SecretString, id: u64) -> Result<(), Error> {
        self.delete(&format!("api/review/{id}"), token).await
    }
}
