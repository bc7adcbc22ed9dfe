//! Primetime settings administration
//!
//! Admin-only CRUD for the weekly primetime windows — the hours that
//! require approval before a reservation is confirmed. Weekdays are
//! 0-based starting at Monday, matching the backend.

use reserva_client::{ApiClient, Result};
use serde::{Deserialize, Serialize};

const PRIMETIME: &str = "api/reservations/admin/primetime/";

fn primetime_path(id: i64) -> String {
    format!("api/reservations/admin/primetime/{id}/")
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrimeTimeSettings {
    pub id: i64,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u8,
    pub weekday_display: Option<String>,
    /// hh:mm:ss
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePrimeTime {
    pub weekday: u8,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Partial update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePrimeTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Admin: list every configured primetime window.
pub async fn list(client: &ApiClient) -> Result<Vec<PrimeTimeSettings>> {
    client.get_json(PRIMETIME).await
}

/// Admin: add a primetime window, e.g. Wednesday 18:00-21:00.
pub async fn create(client: &ApiClient, payload: &CreatePrimeTime) -> Result<PrimeTimeSettings> {
    client.post_json(PRIMETIME, payload).await
}

/// Admin: change hours or toggle a window.
pub async fn update(
    client: &ApiClient,
    id: i64,
    payload: &UpdatePrimeTime,
) -> Result<PrimeTimeSettings> {
    client.put_json(&primetime_path(id), payload).await
}

/// Admin: remove a primetime window.
pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&primetime_path(id)).await
}
