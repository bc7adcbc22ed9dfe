//! Endpoint wrappers exercised against an in-process axum backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;

use reserva_api::users;
use reserva_api::{
    CreatePrimeTime, CreateReservation, MonthCache, UpdatePrimeTime, UpdateReservation,
};
use reserva_client::{ApiClient, ClientConfig};

struct BackendState {
    logout_fails: bool,
    calendar_hits: AtomicUsize,
}

#[derive(Clone)]
struct TestBackend(Arc<BackendState>);

async fn login(Json(body): Json<serde_json::Value>) -> Response {
    if body["email"] == "ana@example.com" && body["password"] == "pw" {
        Json(json!({
            "message": "welcome",
            "tokens": {"access": "at_login", "refresh": "rt_login"},
            "user": {"id": 7, "email": "ana@example.com", "username": "ana", "role": "user"}
        }))
        .into_response()
    } else {
        (StatusCode::BAD_REQUEST, "bad credentials").into_response()
    }
}

async fn logout(State(backend): State<TestBackend>) -> Response {
    if backend.0.logout_fails {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
    } else {
        Json(json!({"message": "bye"})).into_response()
    }
}

async fn me() -> Json<serde_json::Value> {
    Json(json!({"id": 7, "email": "ana@example.com", "username": "ana", "role": "user"}))
}

fn reservation_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user": "ana@example.com",
        "booking_name": name,
        "start_time": "09:00",
        "end_time": "11:00",
        "reservation_type": "meeting",
        "date": "2026-09-14"
    })
}

async fn create_reservation(Json(body): Json<serde_json::Value>) -> Response {
    Json(reservation_json(
        101,
        body["booking_name"].as_str().unwrap_or(""),
    ))
    .into_response()
}

async fn update_reservation(
    Path(id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    Json(reservation_json(
        id,
        body["booking_name"].as_str().unwrap_or("unchanged"),
    ))
    .into_response()
}

async fn delete_reservation(Path(_id): Path<i64>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn approve_reservation(Path(id): Path<i64>, Json(body): Json<serde_json::Value>) -> Response {
    let mut reservation = reservation_json(id, "Board meeting");
    match body["action"].as_str() {
        Some("approve") => reservation["status"] = json!("approved"),
        Some("reject") => {
            reservation["status"] = json!("rejected");
            reservation["rejection_reason"] = body["rejection_reason"].clone();
        }
        _ => return (StatusCode::BAD_REQUEST, "unknown action").into_response(),
    }
    Json(reservation).into_response()
}

fn primetime_json(id: i64, weekday: u64, is_active: bool) -> serde_json::Value {
    json!({
        "id": id,
        "weekday": weekday,
        "weekday_display": "Wednesday",
        "start_time": "18:00:00",
        "end_time": "21:00:00",
        "is_active": is_active
    })
}

async fn list_primetime() -> Json<serde_json::Value> {
    Json(json!([primetime_json(1, 2, true)]))
}

async fn create_primetime(Json(body): Json<serde_json::Value>) -> Response {
    Json(primetime_json(
        7,
        body["weekday"].as_u64().unwrap_or(0),
        body["is_active"].as_bool().unwrap_or(true),
    ))
    .into_response()
}

async fn update_primetime(Path(id): Path<i64>, Json(body): Json<serde_json::Value>) -> Response {
    Json(primetime_json(
        id,
        body["weekday"].as_u64().unwrap_or(2),
        body["is_active"].as_bool().unwrap_or(true),
    ))
    .into_response()
}

async fn delete_primetime(Path(_id): Path<i64>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn user_dashboard() -> Json<serde_json::Value> {
    Json(json!({
        "upcoming_reservations": [reservation_json(1, "Standup")],
        "pending_trades": {"sent": 1, "received": 0},
        "recent_activity": []
    }))
}

async fn admin_dashboard() -> Json<serde_json::Value> {
    Json(json!({"pending_approvals": 3, "todays_reservations": 5}))
}

#[derive(serde::Deserialize)]
struct CalendarQuery {
    start_date: String,
    end_date: String,
}

async fn calendar(
    State(backend): State<TestBackend>,
    Query(query): Query<CalendarQuery>,
) -> Json<serde_json::Value> {
    backend.0.calendar_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "start_date": &query.start_date,
        "end_date": &query.end_date,
        "calendar": [{
            "date": &query.start_date,
            "is_primetime": false,
            "primetime_hours": null,
            "business_hours": {"start_time": "08:00", "end_time": "20:00"},
            "available_slots": [
                {"start_time": "08:00", "end_time": "09:00", "type": "FREE_FOR_ALL", "available": true}
            ],
            "reserved_slots": []
        }]
    }))
}

async fn spawn_backend(logout_fails: bool) -> (String, TestBackend) {
    let backend = TestBackend(Arc::new(BackendState {
        logout_fails,
        calendar_hits: AtomicUsize::new(0),
    }));

    let app = Router::new()
        .route("/api/users/login/", post(login))
        .route("/api/users/logout/", post(logout))
        .route("/api/users/me/", get(me))
        .route(
            "/api/reservations/",
            get(|| async { Json(json!([reservation_json(1, "Standup")])) }).post(create_reservation),
        )
        .route(
            "/api/reservations/{id}/",
            put(update_reservation).delete(delete_reservation),
        )
        .route("/api/reservations/{id}/approve/", post(approve_reservation))
        .route("/api/reservations/calendar/", get(calendar))
        .route(
            "/api/reservations/admin/primetime/",
            get(list_primetime).post(create_primetime),
        )
        .route(
            "/api/reservations/admin/primetime/{id}/",
            put(update_primetime).delete(delete_primetime),
        )
        .route("/api/reservations/dashboard/user/", get(user_dashboard))
        .route("/api/reservations/dashboard/admin/", get(admin_dashboard))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), backend)
}

fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(ClientConfig::new(base_url).unwrap()).unwrap()
}

#[tokio::test]
async fn login_installs_the_access_token() {
    let (base, _backend) = spawn_backend(false).await;
    let client = client_for(&base);

    let response = users::login(&client, "ana@example.com", "pw").await.unwrap();
    assert_eq!(response.tokens.access, "at_login");
    assert_eq!(client.tokens().get().await.as_deref(), Some("at_login"));
}

#[tokio::test]
async fn failed_login_leaves_no_token() {
    let (base, _backend) = spawn_backend(false).await;
    let client = client_for(&base);

    let err = users::login(&client, "ana@example.com", "wrong").await;
    assert!(err.is_err());
    assert_eq!(client.tokens().get().await, None);
}

#[tokio::test]
async fn logout_clears_the_token() {
    let (base, _backend) = spawn_backend(false).await;
    let client = client_for(&base);
    client.tokens().set("at_login".into()).await;

    users::logout(&client).await.unwrap();
    assert_eq!(client.tokens().get().await, None);
}

#[tokio::test]
async fn logout_clears_the_token_even_when_the_call_fails() {
    let (base, _backend) = spawn_backend(true).await;
    let client = client_for(&base);
    client.tokens().set("at_login".into()).await;

    let result = users::logout(&client).await;
    assert!(result.is_err(), "backend failure must still propagate");
    assert_eq!(client.tokens().get().await, None);
}

#[tokio::test]
async fn current_user_returns_typed_profile() {
    let (base, _backend) = spawn_backend(false).await;
    let client = client_for(&base);

    let profile = users::current_user(&client).await.unwrap();
    assert_eq!(profile.email, "ana@example.com");
    assert_eq!(profile.username.as_deref(), Some("ana"));
}

#[tokio::test]
async fn reservation_crud_round_trips() {
    let (base, _backend) = spawn_backend(false).await;
    let client = client_for(&base);

    let listed = reserva_api::reservations::list(&client).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].booking_name, "Standup");

    let created = reserva_api::reservations::create(
        &client,
        &CreateReservation {
            user: "ana@example.com".into(),
            booking_name: "Retro".into(),
            start_time: "09:00".into(),
            end_time: "10:00".into(),
            reservation_type: "meeting".into(),
            date: "2026-09-14".into(),
            notes: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(created.id, 101);
    assert_eq!(created.booking_name, "Retro");

    let updated = reserva_api::reservations::update(
        &client,
        101,
        &UpdateReservation {
            booking_name: Some("Retro (moved)".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.booking_name, "Retro (moved)");

    reserva_api::reservations::delete(&client, 101).await.unwrap();
}

#[tokio::test]
async fn approve_and_reject_set_status() {
    let (base, _backend) = spawn_backend(false).await;
    let client = client_for(&base);

    let approved = reserva_api::reservations::approve(&client, 5).await.unwrap();
    assert_eq!(approved.status.as_deref(), Some("approved"));

    let rejected = reserva_api::reservations::reject(&client, 5, "double booked")
        .await
        .unwrap();
    assert_eq!(rejected.status.as_deref(), Some("rejected"));
    assert_eq!(rejected.rejection_reason.as_deref(), Some("double booked"));
}

#[tokio::test]
async fn primetime_admin_crud_round_trips() {
    let (base, _backend) = spawn_backend(false).await;
    let client = client_for(&base);

    let listed = reserva_api::primetime::list(&client).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].weekday_display.as_deref(), Some("Wednesday"));

    let created = reserva_api::primetime::create(
        &client,
        &CreatePrimeTime {
            weekday: 2,
            start_time: "18:00".into(),
            end_time: "21:00".into(),
            is_active: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(created.id, 7);
    assert_eq!(created.weekday, 2);

    let updated = reserva_api::primetime::update(
        &client,
        7,
        &UpdatePrimeTime {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(!updated.is_active);

    reserva_api::primetime::delete(&client, 7).await.unwrap();
}

#[tokio::test]
async fn dashboards_return_typed_overviews() {
    let (base, _backend) = spawn_backend(false).await;
    let client = client_for(&base);

    let user = reserva_api::dashboard::user_dashboard(&client).await.unwrap();
    assert_eq!(user.upcoming_reservations.len(), 1);
    assert_eq!(user.pending_trades.unwrap().sent, 1);
    assert!(user.pending_approvals.is_none());

    let admin = reserva_api::dashboard::admin_dashboard(&client).await.unwrap();
    assert_eq!(admin.pending_approvals, Some(3));
    assert_eq!(admin.todays_reservations, Some(5));
}

#[tokio::test]
async fn out_of_range_month_is_rejected_before_any_request() {
    let (base, backend) = spawn_backend(false).await;
    let client = client_for(&base);
    let mut cache = MonthCache::new(4, Duration::from_secs(60));

    let err = cache.fetch_month(&client, 2026, 13, false).await.unwrap_err();
    assert!(matches!(err, reserva_client::Error::Config(_)), "got {err:?}");
    assert!(cache.fetch_month(&client, 2026, 0, false).await.is_err());

    assert_eq!(
        backend.0.calendar_hits.load(Ordering::SeqCst),
        0,
        "invalid months must never reach the backend"
    );
}

#[tokio::test]
async fn month_cache_fetches_once_until_forced() {
    let (base, backend) = spawn_backend(false).await;
    let client = client_for(&base);
    let mut cache = MonthCache::new(4, Duration::from_secs(60));

    let first = cache.fetch_month(&client, 2026, 9, false).await.unwrap();
    assert_eq!(first.start_date, "2026-09-01");
    assert_eq!(first.end_date, "2026-09-30");

    cache.fetch_month(&client, 2026, 9, false).await.unwrap();
    assert_eq!(
        backend.0.calendar_hits.load(Ordering::SeqCst),
        1,
        "second lookup must be served from cache"
    );

    cache.fetch_month(&client, 2026, 9, true).await.unwrap();
    assert_eq!(backend.0.calendar_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn fetch_day_finds_the_requested_date() {
    let (base, _backend) = spawn_backend(false).await;
    let client = client_for(&base);
    let mut cache = MonthCache::new(4, Duration::from_secs(60));

    let day = cache
        .fetch_day(&client, "2026-09-01", false)
        .await
        .unwrap()
        .expect("backend serves the first of the month");
    assert_eq!(day.business_hours.start_time, "08:00");

    let missing = cache.fetch_day(&client, "2026-09-02", false).await.unwrap();
    assert!(missing.is_none());

    let invalid = cache.fetch_day(&client, "garbage", false).await.unwrap();
    assert!(invalid.is_none());
}
