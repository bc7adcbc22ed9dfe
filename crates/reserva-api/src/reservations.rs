//! Reservation CRUD and admin approval endpoints

use reserva_client::{ApiClient, Result};
use serde::{Deserialize, Serialize};

const RESERVATIONS: &str = "api/reservations/";

fn reservation_path(id: i64) -> String {
    format!("api/reservations/{id}/")
}

fn approval_path(id: i64) -> String {
    format!("api/reservations/{id}/approve/")
}

/// The backend returns either a bare user identifier or an expanded
/// object depending on the viewer's role.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReservationUser {
    Reference(String),
    Expanded {
        id: i64,
        email: String,
        first_name: Option<String>,
        last_name: Option<String>,
        role: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub user: ReservationUser,
    pub booking_name: String,
    pub status: Option<String>,
    pub status_display: Option<String>,
    /// hh:mm
    pub start_time: String,
    /// hh:mm
    pub end_time: String,
    pub reservation_type: String,
    pub reservation_type_display: Option<String>,
    pub notes: Option<String>,
    /// yyyy-mm-dd
    pub date: String,
    pub is_editable: Option<bool>,
    pub can_be_traded: Option<bool>,
    pub rejection_reason: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateReservation {
    /// User ID or email
    pub user: String,
    pub booking_name: String,
    pub start_time: String,
    pub end_time: String,
    pub reservation_type: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct ApprovalAction<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection_reason: Option<&'a str>,
}

/// List the caller's reservations (all reservations for admins).
pub async fn list(client: &ApiClient) -> Result<Vec<Reservation>> {
    client.get_json(RESERVATIONS).await
}

pub async fn get(client: &ApiClient, id: i64) -> Result<Reservation> {
    client.get_json(&reservation_path(id)).await
}

pub async fn create(client: &ApiClient, payload: &CreateReservation) -> Result<Reservation> {
    client.post_json(RESERVATIONS, payload).await
}

pub async fn update(
    client: &ApiClient,
    id: i64,
    payload: &UpdateReservation,
) -> Result<Reservation> {
    client.put_json(&reservation_path(id), payload).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&reservation_path(id)).await
}

/// Admin: approve a pending reservation.
pub async fn approve(client: &ApiClient, id: i64) -> Result<Reservation> {
    client
        .post_json(
            &approval_path(id),
            &ApprovalAction {
                action: "approve",
                rejection_reason: None,
            },
        )
        .await
}

/// Admin: reject a pending reservation with a reason.
pub async fn reject(client: &ApiClient, id: i64, reason: &str) -> Result<Reservation> {
    client
        .post_json(
            &approval_path(id),
            &ApprovalAction {
                action: "reject",
                rejection_reason: Some(reason),
            },
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_carry_trailing_slashes() {
        assert_eq!(reservation_path(42), "api/reservations/42/");
        assert_eq!(approval_path(42), "api/reservations/42/approve/");
    }

    #[test]
    fn reservation_deserializes_with_expanded_user() {
        let json = r#"{
            "id": 1,
            "user": {"id": 9, "email": "a@b.c", "first_name": "Ana", "last_name": null, "role": "user"},
            "booking_name": "Board meeting",
            "start_time": "09:00",
            "end_time": "11:00",
            "reservation_type": "meeting",
            "date": "2026-09-01"
        }"#;
        let reservation: Reservation = serde_json::from_str(json).unwrap();
        assert!(matches!(
            reservation.user,
            ReservationUser::Expanded { id: 9, .. }
        ));
        assert_eq!(reservation.booking_name, "Board meeting");
    }

    #[test]
    fn reservation_deserializes_with_user_reference() {
        let json = r#"{
            "id": 2,
            "user": "a@b.c",
            "booking_name": "Yoga",
            "start_time": "18:00",
            "end_time": "19:00",
            "reservation_type": "event",
            "date": "2026-09-02"
        }"#;
        let reservation: Reservation = serde_json::from_str(json).unwrap();
        assert!(matches!(reservation.user, ReservationUser::Reference(ref r) if r == "a@b.c"));
    }

    #[test]
    fn update_payload_sends_only_set_fields() {
        let payload = UpdateReservation {
            notes: Some("moved".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json["notes"], "moved");
    }

    #[test]
    fn approval_actions_serialize_expected_shape() {
        let approve = ApprovalAction {
            action: "approve",
            rejection_reason: None,
        };
        let json = serde_json::to_value(&approve).unwrap();
        assert_eq!(json, serde_json::json!({"action": "approve"}));

        let reject = ApprovalAction {
            action: "reject",
            rejection_reason: Some("double booked"),
        };
        let json = serde_json::to_value(&reject).unwrap();
        assert_eq!(json["rejection_reason"], "double booked");
    }
}
