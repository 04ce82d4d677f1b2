// libs/scheduling-cell/src/services/slots.rs
//
// Slot generation and availability filtering. Both functions are pure:
// same inputs, same output, no storage access, safe to call from any task.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{Reservation, WorkingHours};

/// All candidate slot starts for `date` under the given working-hours
/// template: `start, start+g, start+2g, ...` while the slot still ends
/// within the working window. Empty when the template is absent, marked
/// non-working, or the granularity is non-positive.
pub fn generate_slots(
    working_hours: Option<&WorkingHours>,
    date: NaiveDate,
    granularity_minutes: i32,
) -> Vec<DateTime<Utc>> {
    let hours = match working_hours {
        Some(h) if h.is_working => h,
        _ => return Vec::new(),
    };
    if granularity_minutes <= 0 {
        return Vec::new();
    }

    let granularity = Duration::minutes(granularity_minutes as i64);
    let window_start = date.and_time(hours.start_time).and_utc();
    let window_end = date.and_time(hours.end_time).and_utc();

    let mut slots = Vec::new();
    let mut slot_start = window_start;
    while slot_start + granularity <= window_end {
        slots.push(slot_start);
        slot_start += granularity;
    }
    slots
}

/// Drop every candidate whose `[s, s + g)` interval overlaps an active
/// reservation. Half-open comparison, so a slot may start exactly where a
/// reservation ends. Order is preserved.
pub fn filter_available(
    candidates: Vec<DateTime<Utc>>,
    reservations: &[Reservation],
    granularity_minutes: i32,
) -> Vec<DateTime<Utc>> {
    let granularity = Duration::minutes(granularity_minutes as i64);

    candidates
        .into_iter()
        .filter(|&slot_start| {
            let slot_end = slot_start + granularity;
            !reservations.iter().any(|r| {
                r.is_active() && slot_start < r.end_time() && slot_end > r.start_time
            })
        })
        .collect()
}
