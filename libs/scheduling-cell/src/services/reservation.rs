// libs/scheduling-cell/src/services/reservation.rs
//
// The reservation transaction: the only path that writes to the booking
// ledger. Check-then-insert runs under a per-provider lock so concurrent
// requests for the same provider serialize; different providers never
// contend.

use chrono::{DateTime, Datelike, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{NewReservation, Reservation, ReservationStatus, SchedulingError};
use crate::repository::{BookingLedger, ScheduleRepository};
use crate::services::conflict;

/// One async mutex per provider, created on first use. Shared across all
/// request handlers via the application state.
#[derive(Default)]
pub struct ProviderLockRegistry {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl ProviderLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, provider_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(provider_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

pub struct ReservationService {
    schedule: Arc<dyn ScheduleRepository>,
    ledger: Arc<dyn BookingLedger>,
    locks: Arc<ProviderLockRegistry>,
    lock_wait: StdDuration,
    max_attempts: u32,
    retry_backoff: StdDuration,
}

impl ReservationService {
    pub fn new(
        schedule: Arc<dyn ScheduleRepository>,
        ledger: Arc<dyn BookingLedger>,
        locks: Arc<ProviderLockRegistry>,
    ) -> Self {
        Self {
            schedule,
            ledger,
            locks,
            lock_wait: StdDuration::from_secs(5),
            max_attempts: 3,
            retry_backoff: StdDuration::from_millis(100),
        }
    }

    pub fn with_policy(
        mut self,
        lock_wait: StdDuration,
        max_attempts: u32,
        retry_backoff: StdDuration,
    ) -> Self {
        self.lock_wait = lock_wait;
        self.max_attempts = max_attempts.max(1);
        self.retry_backoff = retry_backoff;
        self
    }

    /// Create a confirmed reservation, or explain why not. Transient
    /// failures (lock timeout, storage) are retried with backoff up to the
    /// attempt budget; check failures are returned immediately.
    pub async fn reserve(
        &self,
        provider_id: Uuid,
        start_time: DateTime<Utc>,
        duration_minutes: i32,
        client_ref: &str,
    ) -> Result<Reservation, SchedulingError> {
        if duration_minutes <= 0 {
            return Err(SchedulingError::InvalidDuration(duration_minutes));
        }
        if !self.schedule.provider_exists(provider_id).await? {
            return Err(SchedulingError::ProviderNotFound);
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(
                "Reservation attempt {}/{} for provider {} at {}",
                attempt, self.max_attempts, provider_id, start_time
            );

            match self
                .try_reserve(provider_id, start_time, duration_minutes, client_ref)
                .await
            {
                Ok(reservation) => {
                    info!(
                        "Reserved {} for provider {} at {} ({} min)",
                        reservation.id, provider_id, start_time, duration_minutes
                    );
                    return Ok(reservation);
                }
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        "Transient failure on attempt {}/{} for provider {}: {}",
                        attempt, self.max_attempts, provider_id, e
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_reserve(
        &self,
        provider_id: Uuid,
        start_time: DateTime<Utc>,
        duration_minutes: i32,
        client_ref: &str,
    ) -> Result<Reservation, SchedulingError> {
        let lock = self.locks.lock_for(provider_id);
        let _guard = tokio::time::timeout(self.lock_wait, lock.lock())
            .await
            .map_err(|_| SchedulingError::LockTimeout)?;

        // Re-read inside the critical section: the advisory listing the
        // client saw may be stale by now.
        let weekday = start_time.date_naive().weekday().num_days_from_monday() as u8;
        let working_hours = self.schedule.get_working_hours(provider_id, weekday).await?;
        // Reservations never cross midnight (the checker rejects them), so
        // one day's active set is the complete overlap candidate set.
        let active = self
            .ledger
            .get_active_reservations(provider_id, start_time.date_naive())
            .await?;

        conflict::check_reservation(
            provider_id,
            start_time,
            duration_minutes,
            &active,
            working_hours.as_ref(),
        )?;

        self.ledger
            .insert_reservation(NewReservation {
                provider_id,
                start_time,
                duration_minutes,
                status: ReservationStatus::Confirmed,
                client_ref: client_ref.to_string(),
            })
            .await
    }
}
