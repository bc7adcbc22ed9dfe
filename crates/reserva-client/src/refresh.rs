//! Access token refresh protocol
//!
//! A single POST to the refresh endpoint, authenticated by the httpOnly
//! refresh cookie that reqwest's cookie store carries automatically — the
//! client never holds the refresh grant itself. No bearer header, no body.
//!
//! Every failure mode (non-2xx, network error, malformed body, missing
//! or empty `access` field) collapses to `None`: the caller only needs
//! to know whether a new credential exists, and the refresh outcome is
//! never partially applied.

use serde::Deserialize;
use tracing::debug;

use crate::config::join_url;
use crate::endpoints;

/// Response from the refresh endpoint on success.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    /// New access token
    #[serde(default)]
    pub access: Option<String>,
}

/// Ask the backend for a new access token. One attempt, no retry.
pub async fn request_new_access_token(client: &reqwest::Client, base_url: &str) -> Option<String> {
    let url = join_url(base_url, endpoints::REFRESH);

    let response = match client.post(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            debug!(error = %e, "refresh request failed at transport level");
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        debug!(status = status.as_u16(), "refresh endpoint rejected the grant");
        return None;
    }

    let body = match response.json::<RefreshResponse>().await {
        Ok(b) => b,
        Err(e) => {
            debug!(error = %e, "refresh response was not valid JSON");
            return None;
        }
    };

    match body.access {
        Some(token) if !token.is_empty() => Some(token),
        _ => {
            debug!("refresh response missing access field");
            None
        }
    }
}
