// libs/scheduling-cell/src/services/availability.rs
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::models::SchedulingError;
use crate::repository::{BookingLedger, ScheduleRepository};
use crate::services::slots;

/// Read-only "what can I book" queries. May observe a slightly stale ledger
/// snapshot; every answer is re-validated at commit time by the reservation
/// transaction.
pub struct AvailabilityService {
    schedule: Arc<dyn ScheduleRepository>,
    ledger: Arc<dyn BookingLedger>,
}

impl AvailabilityService {
    pub fn new(schedule: Arc<dyn ScheduleRepository>, ledger: Arc<dyn BookingLedger>) -> Self {
        Self { schedule, ledger }
    }

    /// Open slot starts for a provider on `date`, chronologically ordered.
    /// A provider with no template (or a non-working day) simply has no
    /// slots; that is not an error for a listing.
    pub async fn list_available_slots(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        granularity_minutes: i32,
    ) -> Result<Vec<DateTime<Utc>>, SchedulingError> {
        if granularity_minutes <= 0 {
            return Err(SchedulingError::InvalidDuration(granularity_minutes));
        }

        let weekday = date.weekday().num_days_from_monday() as u8;
        let working_hours = self.schedule.get_working_hours(provider_id, weekday).await?;

        let candidates = slots::generate_slots(working_hours.as_ref(), date, granularity_minutes);
        if candidates.is_empty() {
            debug!("No bookable window for provider {} on {}", provider_id, date);
            return Ok(Vec::new());
        }

        let reservations = self.ledger.get_active_reservations(provider_id, date).await?;
        let available = slots::filter_available(candidates, &reservations, granularity_minutes);

        debug!(
            "Provider {} has {} open slots on {} at {} minute granularity",
            provider_id,
            available.len(),
            date,
            granularity_minutes
        );
        Ok(available)
    }
}
