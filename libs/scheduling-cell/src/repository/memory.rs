// libs/scheduling-cell/src/repository/memory.rs
//
// In-process repository implementations. Used by the engine tests; also
// handy for local development without a database.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{NewReservation, Reservation, ReservationStatus, SchedulingError, WorkingHours};
use crate::repository::{BookingLedger, ScheduleRepository};

#[derive(Default)]
pub struct InMemoryScheduleRepository {
    schedules: RwLock<HashMap<Uuid, HashMap<u8, WorkingHours>>>,
}

impl InMemoryScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider with no working hours yet.
    pub async fn add_provider(&self, provider_id: Uuid) {
        self.schedules.write().await.entry(provider_id).or_default();
    }

    pub async fn set_working_hours(&self, hours: WorkingHours) {
        self.schedules
            .write()
            .await
            .entry(hours.provider_id)
            .or_default()
            .insert(hours.weekday, hours);
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn provider_exists(&self, provider_id: Uuid) -> Result<bool, SchedulingError> {
        Ok(self.schedules.read().await.contains_key(&provider_id))
    }

    async fn get_working_hours(
        &self,
        provider_id: Uuid,
        weekday: u8,
    ) -> Result<Option<WorkingHours>, SchedulingError> {
        Ok(self
            .schedules
            .read()
            .await
            .get(&provider_id)
            .and_then(|days| days.get(&weekday))
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryBookingLedger {
    reservations: RwLock<HashMap<Uuid, Reservation>>,
    fail_inserts: AtomicU32,
}

impl InMemoryBookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` inserts fail with a storage error, for
    /// exercising the transaction's retry path.
    pub fn fail_next_inserts(&self, count: u32) {
        self.fail_inserts.store(count, Ordering::SeqCst);
    }

    pub async fn all_reservations(&self) -> Vec<Reservation> {
        let mut all: Vec<Reservation> =
            self.reservations.read().await.values().cloned().collect();
        all.sort_by_key(|r| r.start_time);
        all
    }
}

#[async_trait]
impl BookingLedger for InMemoryBookingLedger {
    async fn get_active_reservations(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, SchedulingError> {
        let mut matching: Vec<Reservation> = self
            .reservations
            .read()
            .await
            .values()
            .filter(|r| {
                r.provider_id == provider_id
                    && r.start_time.date_naive() == date
                    && r.status.is_active()
            })
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.start_time);
        Ok(matching)
    }

    async fn get_reservations_for_day(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, SchedulingError> {
        let mut matching: Vec<Reservation> = self
            .reservations
            .read()
            .await
            .values()
            .filter(|r| r.provider_id == provider_id && r.start_time.date_naive() == date)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.start_time);
        Ok(matching)
    }

    async fn insert_reservation(
        &self,
        reservation: NewReservation,
    ) -> Result<Reservation, SchedulingError> {
        if self
            .fail_inserts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SchedulingError::Storage("injected insert failure".to_string()));
        }

        let now = Utc::now();
        let committed = Reservation {
            id: Uuid::new_v4(),
            provider_id: reservation.provider_id,
            start_time: reservation.start_time,
            duration_minutes: reservation.duration_minutes,
            status: reservation.status,
            client_ref: reservation.client_ref,
            created_at: now,
            updated_at: now,
        };
        self.reservations
            .write()
            .await
            .insert(committed.id, committed.clone());
        Ok(committed)
    }

    async fn get_reservation(&self, reservation_id: Uuid) -> Result<Reservation, SchedulingError> {
        self.reservations
            .read()
            .await
            .get(&reservation_id)
            .cloned()
            .ok_or(SchedulingError::ReservationNotFound)
    }

    async fn update_status(
        &self,
        reservation_id: Uuid,
        status: ReservationStatus,
    ) -> Result<Reservation, SchedulingError> {
        let mut reservations = self.reservations.write().await;
        let reservation = reservations
            .get_mut(&reservation_id)
            .ok_or(SchedulingError::ReservationNotFound)?;
        reservation.status = status;
        reservation.updated_at = Utc::now();
        Ok(reservation.clone())
    }
}
