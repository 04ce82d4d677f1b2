// libs/scheduling-cell/src/services/conflict.rs
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::{Reservation, SchedulingError, WorkingHours};

/// Validate one candidate interval against working hours and the active
/// reservations read for its day. Accepts arbitrary durations; the listing
/// granularity plays no part here.
///
/// Time-of-day containment means intervals may not cross midnight: the
/// working-hours template is a same-day window.
pub fn check_reservation(
    provider_id: Uuid,
    start_time: DateTime<Utc>,
    duration_minutes: i32,
    active_reservations: &[Reservation],
    working_hours: Option<&WorkingHours>,
) -> Result<(), SchedulingError> {
    if duration_minutes <= 0 {
        return Err(SchedulingError::InvalidDuration(duration_minutes));
    }

    let hours = match working_hours {
        Some(h) if h.is_working => h,
        _ => return Err(SchedulingError::OutsideWorkingHours),
    };

    let end_time = start_time + Duration::minutes(duration_minutes as i64);
    if end_time.date_naive() != start_time.date_naive() {
        return Err(SchedulingError::OutsideWorkingHours);
    }
    if start_time.time() < hours.start_time || end_time.time() > hours.end_time {
        return Err(SchedulingError::OutsideWorkingHours);
    }

    // Half-open overlap: existing.start < new.end AND new.start < existing.end.
    let overlapping = active_reservations.iter().any(|r| {
        r.provider_id == provider_id
            && r.is_active()
            && r.start_time < end_time
            && start_time < r.end_time()
    });
    if overlapping {
        return Err(SchedulingError::Conflict);
    }

    Ok(())
}
