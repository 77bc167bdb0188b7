use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;

use super::{ack, ApiError, ApiResponse};
use crate::engine::EngineError;
use crate::middleware::AuthUser;
use crate::models::Slot;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/reservations",
            get(reservations_for_slot).post(book).delete(cancel),
        )
        .route("/seats/availability", get(seat_availability))
        .route("/seats/price", get(price_quote))
}

#[derive(Debug, Deserialize)]
struct SeatSelection {
    date: NaiveDate,
    time: NaiveTime,
    seats: Vec<u32>,
}

impl SeatSelection {
    fn slot(&self) -> Slot {
        Slot::new(self.date, self.time)
    }
}

// POST /api/reservations
async fn book(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<SeatSelection>,
) -> Result<impl IntoResponse, ApiError> {
    let reservation = state
        .engine
        .book(&user.username, req.slot(), &req.seats)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Reservation confirmed", reservation),
    ))
}

// DELETE /api/reservations
async fn cancel(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<SeatSelection>,
) -> Result<impl IntoResponse, ApiError> {
    let cancelled = state
        .engine
        .cancel(&user.username, req.slot(), &req.seats)
        .await?;
    let (status, message) = if cancelled {
        (StatusCode::OK, "Reservation cancelled")
    } else {
        (StatusCode::NOT_FOUND, "Could not cancel")
    };
    Ok((status, ack(cancelled, message)))
}

#[derive(Debug, Deserialize)]
struct SlotQuery {
    date: NaiveDate,
    time: NaiveTime,
}

// GET /api/reservations?date=2024-01-01&time=18:00:00
async fn reservations_for_slot(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SlotQuery>,
) -> impl IntoResponse {
    let reservations = state
        .engine
        .reservations_for_slot(Slot::new(params.date, params.time))
        .await;
    ApiResponse::ok("Success", reservations)
}

#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    date: NaiveDate,
    time: NaiveTime,
    seat: u32,
}

// GET /api/seats/availability?date=..&time=..&seat=3
async fn seat_availability(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AvailabilityQuery>,
) -> impl IntoResponse {
    let available = state
        .engine
        .is_available(Slot::new(params.date, params.time), params.seat)
        .await;
    let message = if available {
        "Seat available"
    } else {
        "Seat unavailable"
    };
    ApiResponse::ok(message, available)
}

#[derive(Debug, Deserialize)]
struct PriceQuery {
    seats: String,
}

// GET /api/seats/price?seats=1,2,3
async fn price_quote(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PriceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let seats = parse_seat_list(&params.seats)?;
    let total = state.engine.price_of(&seats).await;
    Ok(ApiResponse::ok("Success", total))
}

fn parse_seat_list(raw: &str) -> Result<Vec<u32>, ApiError> {
    raw.split(',')
        .map(|token| token.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| {
            EngineError::InvalidArgument("seats must be a comma-separated list of indices".into())
                .into()
        })
}
