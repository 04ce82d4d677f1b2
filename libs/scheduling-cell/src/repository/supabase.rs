// libs/scheduling-cell/src/repository/supabase.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::{DatabaseError, SupabaseClient};

use crate::models::{NewReservation, Reservation, ReservationStatus, SchedulingError, WorkingHours};
use crate::repository::{BookingLedger, ScheduleRepository};

/// Auth failures and other 4xx rejections are deterministic, so they must
/// not land in the retryable `Storage` bucket; everything else may be a
/// hiccup worth retrying.
fn storage_error(e: DatabaseError) -> SchedulingError {
    match e {
        DatabaseError::Auth(message) => SchedulingError::PermissionDenied(message),
        e if e.is_client_error() => SchedulingError::StorageRejected(e.to_string()),
        e => SchedulingError::Storage(e.to_string()),
    }
}

fn day_bounds(date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), SchedulingError> {
    let start = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| SchedulingError::Storage("invalid date".to_string()))?
        .and_utc();
    let end = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| SchedulingError::Storage("invalid date".to_string()))?
        .and_utc();
    Ok((start, end))
}

/// Working-hours reads backed by the `providers` / `provider_schedules`
/// tables. Built per request so the caller's bearer token travels with every
/// query (row-level security).
pub struct SupabaseScheduleRepository {
    supabase: Arc<SupabaseClient>,
    auth_token: String,
}

impl SupabaseScheduleRepository {
    pub fn new(supabase: Arc<SupabaseClient>, auth_token: &str) -> Self {
        Self {
            supabase,
            auth_token: auth_token.to_string(),
        }
    }
}

#[async_trait]
impl ScheduleRepository for SupabaseScheduleRepository {
    async fn provider_exists(&self, provider_id: Uuid) -> Result<bool, SchedulingError> {
        let path = format!("/rest/v1/providers?id=eq.{}&select=id", provider_id);

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await
            .map_err(storage_error)?;

        Ok(!result.is_empty())
    }

    async fn get_working_hours(
        &self,
        provider_id: Uuid,
        weekday: u8,
    ) -> Result<Option<WorkingHours>, SchedulingError> {
        debug!("Fetching working hours for provider {} weekday {}", provider_id, weekday);

        let path = format!(
            "/rest/v1/provider_schedules?provider_id=eq.{}&weekday=eq.{}&limit=1",
            provider_id, weekday
        );

        let result: Vec<WorkingHours> = self
            .supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await
            .map_err(storage_error)?;

        Ok(result.into_iter().next())
    }
}

/// Reservation reads and writes against the `reservations` table.
pub struct SupabaseBookingLedger {
    supabase: Arc<SupabaseClient>,
    auth_token: String,
}

impl SupabaseBookingLedger {
    pub fn new(supabase: Arc<SupabaseClient>, auth_token: &str) -> Self {
        Self {
            supabase,
            auth_token: auth_token.to_string(),
        }
    }

    fn representation_headers() -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );
        headers
    }
}

#[async_trait]
impl BookingLedger for SupabaseBookingLedger {
    async fn get_active_reservations(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, SchedulingError> {
        let (day_start, day_end) = day_bounds(date)?;

        let path = format!(
            "/rest/v1/reservations?provider_id=eq.{}&start_time=gte.{}&start_time=lte.{}&status=in.(pending,confirmed)&order=start_time.asc",
            provider_id,
            day_start.to_rfc3339(),
            day_end.to_rfc3339()
        );

        self.supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await
            .map_err(storage_error)
    }

    async fn get_reservations_for_day(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, SchedulingError> {
        let (day_start, day_end) = day_bounds(date)?;

        let path = format!(
            "/rest/v1/reservations?provider_id=eq.{}&start_time=gte.{}&start_time=lte.{}&order=start_time.asc",
            provider_id,
            day_start.to_rfc3339(),
            day_end.to_rfc3339()
        );

        self.supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await
            .map_err(storage_error)
    }

    async fn insert_reservation(
        &self,
        reservation: NewReservation,
    ) -> Result<Reservation, SchedulingError> {
        let now = Utc::now();
        let body = json!({
            "id": Uuid::new_v4(),
            "provider_id": reservation.provider_id,
            "start_time": reservation.start_time.to_rfc3339(),
            "duration_minutes": reservation.duration_minutes,
            "status": reservation.status.to_string(),
            "client_ref": reservation.client_ref,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339(),
        });

        let result: Vec<Reservation> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/reservations",
                Some(&self.auth_token),
                Some(body),
                Some(Self::representation_headers()),
            )
            .await
            .map_err(storage_error)?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| SchedulingError::Storage("insert returned no row".to_string()))
    }

    async fn get_reservation(&self, reservation_id: Uuid) -> Result<Reservation, SchedulingError> {
        let path = format!("/rest/v1/reservations?id=eq.{}", reservation_id);

        let result: Vec<Reservation> = self
            .supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await
            .map_err(storage_error)?;

        result.into_iter().next().ok_or(SchedulingError::ReservationNotFound)
    }

    async fn update_status(
        &self,
        reservation_id: Uuid,
        status: ReservationStatus,
    ) -> Result<Reservation, SchedulingError> {
        let path = format!("/rest/v1/reservations?id=eq.{}", reservation_id);
        let body = json!({
            "status": status.to_string(),
            "updated_at": Utc::now().to_rfc3339(),
        });

        let result: Vec<Reservation> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(&self.auth_token),
                Some(body),
                Some(Self::representation_headers()),
            )
            .await
            .map_err(storage_error)?;

        result.into_iter().next().ok_or(SchedulingError::ReservationNotFound)
    }
}
