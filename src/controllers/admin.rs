use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, post, put};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;

use super::{ack, ApiError, ApiResponse};
use crate::middleware::AdminKey;
use crate::models::{Reservation, Slot};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/seating", put(reconfigure_seating))
        .route("/admin/price", put(set_seat_price))
        .route("/admin/locks", post(lock_seats).delete(unlock_seats))
        .route("/admin/hours", put(set_hours))
        .route("/admin/reservations", delete(admin_cancel))
        .route("/admin/slots", delete(cancel_slot))
        .route("/admin/validate", post(validate_key))
}

#[derive(Debug, Deserialize)]
struct SeatingRequest {
    rows: u32,
    cols: u32,
    default_price: f64,
}

// PUT /api/admin/seating
async fn reconfigure_seating(
    State(state): State<Arc<AppState>>,
    _admin: AdminKey,
    Json(req): Json<SeatingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .engine
        .reconfigure(req.rows, req.cols, req.default_price)
        .await?;
    Ok(ack(true, "Seating configured"))
}

#[derive(Debug, Deserialize)]
struct PriceRequest {
    seat: u32,
    price: f64,
}

// PUT /api/admin/price
async fn set_seat_price(
    State(state): State<Arc<AppState>>,
    _admin: AdminKey,
    Json(req): Json<PriceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.engine.set_price(req.seat, req.price).await?;
    Ok(ack(true, "Price set"))
}

#[derive(Debug, Deserialize)]
struct LockRequest {
    seats: Vec<u32>,
}

// POST /api/admin/locks
async fn lock_seats(
    State(state): State<Arc<AppState>>,
    _admin: AdminKey,
    Json(req): Json<LockRequest>,
) -> impl IntoResponse {
    state.engine.lock_seats(&req.seats).await;
    ack(true, "Seats locked")
}

// DELETE /api/admin/locks
async fn unlock_seats(
    State(state): State<Arc<AppState>>,
    _admin: AdminKey,
    Json(req): Json<LockRequest>,
) -> impl IntoResponse {
    state.engine.unlock_seats(&req.seats).await;
    ack(true, "Seats unlocked")
}

#[derive(Debug, Deserialize)]
struct HoursRequest {
    open: NaiveTime,
    close: NaiveTime,
}

// PUT /api/admin/hours
async fn set_hours(
    State(state): State<Arc<AppState>>,
    _admin: AdminKey,
    Json(req): Json<HoursRequest>,
) -> impl IntoResponse {
    state.engine.set_hours(req.open, req.close).await;
    ack(true, "Hours set")
}

// DELETE /api/admin/reservations — removal by full identity, whoever the
// owner is (admin seat-click cancellation flow).
async fn admin_cancel(
    State(state): State<Arc<AppState>>,
    _admin: AdminKey,
    Json(reservation): Json<Reservation>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state.engine.admin_cancel(&reservation).await?;
    let (status, message) = if removed {
        (StatusCode::OK, "Reservation cancelled")
    } else {
        (StatusCode::NOT_FOUND, "Reservation not found")
    };
    Ok((status, ack(removed, message)))
}

#[derive(Debug, Deserialize)]
struct SlotRequest {
    date: NaiveDate,
    time: NaiveTime,
}

// DELETE /api/admin/slots
async fn cancel_slot(
    State(state): State<Arc<AppState>>,
    _admin: AdminKey,
    Json(req): Json<SlotRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .engine
        .cancel_all_in_slot(Slot::new(req.date, req.time))
        .await?;
    Ok(ApiResponse::ok(
        "All reservations cancelled for slot",
        removed,
    ))
}

#[derive(Debug, Deserialize)]
struct ValidateRequest {
    key: String,
}

// POST /api/admin/validate — key in the body, no header required.
async fn validate_key(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateRequest>,
) -> impl IntoResponse {
    let ok = state.engine.validate_admin(&req.key);
    let (status, message) = if ok {
        (StatusCode::OK, "Admin access granted")
    } else {
        (StatusCode::UNAUTHORIZED, "Invalid admin key")
    };
    (status, ack(ok, message))
}
