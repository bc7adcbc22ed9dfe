//! User and session endpoints
//!
//! Login installs the returned access token into the client's token
//! holder; logout clears it even when the backend call fails, so a dead
//! session can't strand a stale credential in memory.

use reserva_client::{ApiClient, ApiRequest, Result, endpoints};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Token pair issued at login. The refresh token also rides in an
/// httpOnly cookie; the field is present for completeness only.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: Option<String>,
}

/// Abbreviated account info returned by login.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSummary {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub message: Option<String>,
    pub tokens: TokenPair,
    pub user: Option<AccountSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub message: Option<String>,
    pub user: Option<AccountSummary>,
}

/// Full profile from the current-user endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

/// Authenticate and install the issued access token.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<LoginResponse> {
    let response: LoginResponse = client
        .post_json(endpoints::LOGIN, &LoginRequest { email, password })
        .await?;
    client.tokens().set(response.tokens.access.clone()).await;
    debug!("login succeeded, access token installed");
    Ok(response)
}

/// End the session. The local credential is cleared whether or not the
/// backend call succeeds; the call's own error still propagates.
pub async fn logout(client: &ApiClient) -> Result<()> {
    let result = client.request(ApiRequest::post(endpoints::LOGOUT)).await;
    client.tokens().clear().await;
    result.map(|_| ())
}

/// Create a new account.
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<RegisterResponse> {
    client.post_json(endpoints::REGISTER, request).await
}

/// Fetch the authenticated user's profile.
pub async fn current_user(client: &ApiClient) -> Result<UserProfile> {
    client.get_json(endpoints::CURRENT_USER).await
}
