//! Dashboard overview endpoints
//!
//! One shape serves both views: the user dashboard fills the upcoming
//! reservations and trade counters, the admin dashboard additionally
//! carries pending-approval and today's-reservation counts.

use reserva_client::{ApiClient, Result};
use serde::Deserialize;

use crate::reservations::Reservation;

const USER_DASHBOARD: &str = "api/reservations/dashboard/user/";
const ADMIN_DASHBOARD: &str = "api/reservations/dashboard/admin/";

#[derive(Debug, Clone, Deserialize)]
pub struct PendingTrades {
    pub sent: u32,
    pub received: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub upcoming_reservations: Vec<Reservation>,
    pub pending_trades: Option<PendingTrades>,
    #[serde(default)]
    pub recent_activity: Vec<serde_json::Value>,
    /// Admin only
    pub pending_approvals: Option<u32>,
    /// Admin only
    pub todays_reservations: Option<u32>,
}

/// The authenticated user's overview: upcoming bookings and trades.
pub async fn user_dashboard(client: &ApiClient) -> Result<DashboardData> {
    client.get_json(USER_DASHBOARD).await
}

/// Admin overview: pending approvals and today's reservations.
pub async fn admin_dashboard(client: &ApiClient) -> Result<DashboardData> {
    client.get_json(ADMIN_DASHBOARD).await
}
