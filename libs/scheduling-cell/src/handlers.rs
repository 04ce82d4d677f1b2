// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{ReservationStatus, ReserveRequest, UpdateReservationStatusRequest};
use crate::repository::{
    BookingLedger, ScheduleRepository, SupabaseBookingLedger, SupabaseScheduleRepository,
};
use crate::services::{AvailabilityService, ReservationLifecycleService, ReservationService};
use crate::state::SchedulingState;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct SlotsQueryParams {
    pub date: NaiveDate,
    pub granularity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ReservationsQueryParams {
    pub date: NaiveDate,
}

fn schedule_repository(
    state: &SchedulingState,
    token: &str,
) -> Arc<dyn ScheduleRepository> {
    Arc::new(SupabaseScheduleRepository::new(state.supabase.clone(), token))
}

fn booking_ledger(state: &SchedulingState, token: &str) -> Arc<dyn BookingLedger> {
    Arc::new(SupabaseBookingLedger::new(state.supabase.clone(), token))
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

/// List the open slot starts for a provider on a given day. Served from the
/// availability cache when fresh; the cache is advisory only and every
/// booking is re-checked at commit time.
#[axum::debug_handler]
pub async fn list_available_slots(
    State(state): State<Arc<SchedulingState>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(provider_id): Path<Uuid>,
    Query(params): Query<SlotsQueryParams>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let granularity = params
        .granularity
        .unwrap_or(state.config.default_slot_granularity_minutes);

    if let Some(slots) = state
        .availability_cache
        .get(provider_id, params.date, granularity)
        .await
    {
        return Ok(Json(json!({
            "provider_id": provider_id,
            "date": params.date,
            "granularity_minutes": granularity,
            "available_slots": slots,
            "cached": true,
        })));
    }

    let availability = AvailabilityService::new(
        schedule_repository(&state, token),
        booking_ledger(&state, token),
    );
    let slots = availability
        .list_available_slots(provider_id, params.date, granularity)
        .await?;

    state
        .availability_cache
        .put(provider_id, params.date, granularity, slots.clone())
        .await;

    Ok(Json(json!({
        "provider_id": provider_id,
        "date": params.date,
        "granularity_minutes": granularity,
        "available_slots": slots,
        "cached": false,
    })))
}

// ==============================================================================
// RESERVATION HANDLERS
// ==============================================================================

/// Provider-scoped day listing of reservations, terminal statuses included.
/// This is the booking-management view; the slots endpoint above is the
/// client-facing one.
#[axum::debug_handler]
pub async fn list_provider_reservations(
    State(state): State<Arc<SchedulingState>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(provider_id): Path<Uuid>,
    Query(params): Query<ReservationsQueryParams>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let reservations = booking_ledger(&state, token)
        .get_reservations_for_day(provider_id, params.date)
        .await?;

    Ok(Json(json!({
        "provider_id": provider_id,
        "date": params.date,
        "reservations": reservations,
    })))
}

#[axum::debug_handler]
pub async fn reserve(
    State(state): State<Arc<SchedulingState>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<ReserveRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let service = ReservationService::new(
        schedule_repository(&state, token),
        booking_ledger(&state, token),
        state.locks.clone(),
    );

    let reservation = service
        .reserve(
            request.provider_id,
            request.start_time,
            request.duration_minutes,
            &request.client_ref,
        )
        .await?;

    state
        .availability_cache
        .invalidate(reservation.provider_id, reservation.start_time.date_naive())
        .await;

    Ok(Json(json!({
        "success": true,
        "reservation": reservation,
    })))
}

#[axum::debug_handler]
pub async fn get_reservation(
    State(state): State<Arc<SchedulingState>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let reservation = booking_ledger(&state, token)
        .get_reservation(reservation_id)
        .await?;

    Ok(Json(json!({ "reservation": reservation })))
}

#[axum::debug_handler]
pub async fn cancel_reservation(
    State(state): State<Arc<SchedulingState>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let lifecycle = ReservationLifecycleService::new(booking_ledger(&state, token));
    let reservation = lifecycle
        .transition(reservation_id, ReservationStatus::Cancelled)
        .await?;

    state
        .availability_cache
        .invalidate(reservation.provider_id, reservation.start_time.date_naive())
        .await;

    Ok(Json(json!({
        "success": true,
        "reservation": reservation,
    })))
}

/// Booking-management status updates (complete / no-show). Cancellation has
/// its own endpoint; creation always goes through `reserve`.
#[axum::debug_handler]
pub async fn update_reservation_status(
    State(state): State<Arc<SchedulingState>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(reservation_id): Path<Uuid>,
    Json(request): Json<UpdateReservationStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let lifecycle = ReservationLifecycleService::new(booking_ledger(&state, token));
    let reservation = lifecycle.transition(reservation_id, request.status).await?;

    state
        .availability_cache
        .invalidate(reservation.provider_id, reservation.start_time.date_naive())
        .await;

    Ok(Json(json!({
        "success": true,
        "reservation": reservation,
    })))
}
