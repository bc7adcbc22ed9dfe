//! HTTP client core with refresh-on-401 retry
//!
//! Each call runs at most one refresh-and-retry cycle: SENDING → 401 →
//! REFRESHING → RETRYING → done or failed. There is no loop back — a 401
//! on the retried request is terminal and clears the token holder.
//!
//! Concurrent callers that observe a 401 at the same time coalesce onto a
//! single refresh request: the refresh gate admits one caller, and the
//! token generation counter lets the others detect that a fresh credential
//! was installed while they waited.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::refresh;
use crate::token::TokenHolder;

/// A request descriptor: method, path, optional JSON body, optional
/// header overrides. Built per call, not retained.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body. The `Content-Type: application/json` header is
    /// added automatically at send time unless an override supplies one.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| Error::Decode(format!("serializing request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Add a header override, replacing any auto-set header of the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Parsed body of a successful response.
///
/// JSON when the response content-type says so, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    /// Deserialize a JSON body into a typed value.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            ResponseBody::Json(value) => serde_json::from_value(value)
                .map_err(|e| Error::Decode(format!("decoding response body: {e}"))),
            ResponseBody::Text(_) => Err(Error::Decode(
                "expected a JSON response, got a text body".into(),
            )),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }
}

/// Authenticated HTTP client for the booking backend.
///
/// Holds the reqwest client (with its cookie store carrying the refresh
/// grant), the base URL configuration, and a shared [`TokenHolder`].
/// Cheap to share via `Arc`; all methods take `&self`.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Arc<TokenHolder>,
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    /// Build a client with its own empty token holder.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_token_holder(config, Arc::new(TokenHolder::new()))
    }

    /// Build a client sharing an existing token holder, so callers (and
    /// tests) can observe or substitute the credential slot.
    pub fn with_token_holder(config: ClientConfig, tokens: Arc<TokenHolder>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Transport(format!("building HTTP client: {e}")))?;
        Ok(Self {
            http,
            config,
            tokens,
            refresh_gate: Mutex::new(()),
        })
    }

    /// Build a client configured from the `RESERVA_API_BASE` env var.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    /// The shared token holder backing this client.
    pub fn tokens(&self) -> &Arc<TokenHolder> {
        &self.tokens
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request, transparently refreshing the access token and
    /// retrying once on 401.
    pub async fn request(&self, request: ApiRequest) -> Result<ResponseBody> {
        let url = self.config.url_for(&request.path);

        let token = self.tokens.get().await;
        let response = self.send(&request, &url, token).await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return match self.refresh_once().await {
                Some(fresh) => {
                    debug!(path = %request.path, "access token refreshed, retrying request");
                    let retry = self.send(&request, &url, Some(fresh)).await?;
                    if retry.status().is_success() {
                        return parse_body(retry).await;
                    }
                    let status = retry.status();
                    let body = retry.text().await.unwrap_or_default();
                    self.tokens.clear().await;
                    warn!(status = status.as_u16(), path = %request.path, "retry after refresh failed");
                    Err(Error::AuthenticationFailed {
                        status: status.as_u16(),
                        body,
                    })
                }
                None => {
                    self.tokens.clear().await;
                    warn!(path = %request.path, "token refresh failed, session expired");
                    Err(Error::SessionExpired)
                }
            };
        }

        if !response.status().is_success() {
            let status = response.status();
            // Best-effort body capture; a read failure yields an empty body
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                body,
            });
        }

        parse_body(response).await
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(ApiRequest::get(path)).await?.decode()
    }

    /// POST a JSON body, decoding the JSON response.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        self.request(ApiRequest::post(path).json(body)?)
            .await?
            .decode()
    }

    /// PUT a JSON body, decoding the JSON response.
    pub async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        self.request(ApiRequest::put(path).json(body)?)
            .await?
            .decode()
    }

    /// DELETE a resource, discarding the response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.request(ApiRequest::delete(path)).await.map(|_| ())
    }

    /// Execute one send of the request, with the given bearer token.
    async fn send(
        &self,
        request: &ApiRequest,
        url: &str,
        token: Option<String>,
    ) -> Result<reqwest::Response> {
        let mut headers = HeaderMap::new();

        if request.body.is_some() && !has_content_type_override(&request.headers) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(token) = token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => {
                    warn!(error = %e, "held access token is not a valid header value, sending without it");
                }
            }
        }

        // Caller overrides win over auto-set headers
        for (name, value) in &request.headers {
            let name = match HeaderName::try_from(name.as_str()) {
                Ok(n) => n,
                Err(e) => {
                    warn!(header = %name, error = %e, "skipping invalid header name");
                    continue;
                }
            };
            let value = match HeaderValue::from_str(value) {
                Ok(v) => v,
                Err(e) => {
                    warn!(header = %name, error = %e, "skipping invalid header value");
                    continue;
                }
            };
            headers.insert(name, value);
        }

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(headers);
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| Error::Decode(format!("serializing request body: {e}")))?;
            builder = builder.body(bytes);
        }

        builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }

    /// Run the refresh protocol once, coalescing concurrent callers.
    ///
    /// Callers snapshot the token generation before queueing on the gate.
    /// Whoever gets in first performs the actual refresh; everyone behind
    /// it sees a newer generation and reuses the installed token instead
    /// of issuing another refresh request.
    async fn refresh_once(&self) -> Option<String> {
        let observed = self.tokens.generation().await;
        let _gate = self.refresh_gate.lock().await;

        if self.tokens.generation().await != observed {
            // Someone else refreshed (or logged out) while we waited.
            // An empty slot here means that refresh failed; report failure
            // rather than issuing a redundant request.
            return self.tokens.get().await;
        }

        let fresh = refresh::request_new_access_token(&self.http, &self.config.base_url).await?;
        self.tokens.set(fresh.clone()).await;
        Some(fresh)
    }
}

/// Whether the caller supplied their own Content-Type override.
fn has_content_type_override(headers: &[(String, String)]) -> bool {
    headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case("content-type"))
}

/// Parse a 2xx response: JSON when the content-type says JSON, raw text
/// otherwise. An unreadable body yields empty text.
async fn parse_body(response: reqwest::Response) -> Result<ResponseBody> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let text = response.text().await.unwrap_or_default();

    if is_json {
        if text.is_empty() {
            return Ok(ResponseBody::Json(serde_json::Value::Null));
        }
        let value = serde_json::from_str(&text)
            .map_err(|e| Error::Decode(format!("response claimed JSON but failed to parse: {e}")))?;
        return Ok(ResponseBody::Json(value));
    }

    Ok(ResponseBody::Text(text))
}
