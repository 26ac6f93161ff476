//! Sync gateway: the single HTTP transport used by every remote-facing component.
//!
//! Builds requests against a fixed base URL, serializes JSON bodies, and
//! classifies failures into [`TransportError`]. It never retries.

use std::borrow::Cow;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

pub use reqwest::Method;

use crate::auth::AuthProvider;
use crate::error::TransportError;
use crate::storage::ApiConfig;

/// HTTP transport bound to one API base URL.
#[derive(Clone)]
pub struct SyncGateway {
    base_url: Url,
    http_client: Client,
    auth: Arc<dyn AuthProvider>,
}

/// Percent-encode caller data used as a single path segment.
pub fn segment(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}

impl SyncGateway {
    /// Create a gateway with a default HTTP client.
    pub fn new(base_url: &str, auth: Arc<dyn AuthProvider>) -> Result<Self, TransportError> {
        Self::with_client(base_url, auth, Client::new())
    }

    /// Create a gateway from the `[api]` config section.
    pub fn from_config(api: &ApiConfig, auth: Arc<dyn AuthProvider>) -> Result<Self, TransportError> {
        let http_client = Client::builder()
            .timeout(api.timeout())
            .build()
            .map_err(TransportError::Network)?;
        Self::with_client(&api.base_url, auth, http_client)
    }

    fn with_client(
        base_url: &str,
        auth: Arc<dyn AuthProvider>,
        http_client: Client,
    ) -> Result<Self, TransportError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            http_client,
            auth,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Resolve an API path (leading `/` optional) against the base URL.
    pub fn url(&self, path: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, TransportError>
    where
        B: Serialize + ?Sized,
    {
        if !self.auth.is_authenticated() {
            return Err(TransportError::NotAuthenticated);
        }

        let url = self.url(path)?;
        tracing::debug!(%method, %url, "gateway request");

        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .headers(self.headers());
        if let Some(token) = self.auth.bearer_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(TransportError::Encode)?;
            request = request.body(payload);
        }

        let resp = request.send().await.map_err(TransportError::Network)?;
        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(%method, %url, status = status.as_u16(), "gateway bad status");
            return Err(TransportError::BadStatus(status.as_u16()));
        }

        let bytes = resp.bytes().await.map_err(TransportError::Network)?;
        Ok(bytes.to_vec())
    }

    /// Send a request and decode the JSON response body into `T`.
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.execute(method, path, body).await?;
        serde_json::from_slice(&bytes).map_err(TransportError::Decode)
    }

    /// Send a request whose response body carries nothing the caller needs.
    pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), TransportError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, body).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body)).await
    }
}

impl std::fmt::Debug for SyncGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncGateway")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.auth.is_authenticated())
            .finish()
    }
}
