// libs/scheduling-cell/tests/conflict_test.rs
use assert_matches::assert_matches;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use scheduling_cell::models::{Reservation, ReservationStatus, SchedulingError, WorkingHours};
use scheduling_cell::services::conflict::check_reservation;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 23).unwrap()
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    monday().and_hms_opt(hour, minute, 0).unwrap().and_utc()
}

fn nine_to_five(provider_id: Uuid) -> WorkingHours {
    WorkingHours {
        provider_id,
        weekday: 0,
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        is_working: true,
    }
}

fn confirmed(provider_id: Uuid, start: DateTime<Utc>, duration_minutes: i32) -> Reservation {
    Reservation {
        id: Uuid::new_v4(),
        provider_id,
        start_time: start,
        duration_minutes,
        status: ReservationStatus::Confirmed,
        client_ref: "client-1".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn accepts_a_free_interval_inside_working_hours() {
    let provider_id = Uuid::new_v4();
    let hours = nine_to_five(provider_id);

    let result = check_reservation(provider_id, at(10, 0), 30, &[], Some(&hours));
    assert_matches!(result, Ok(()));
}

#[test]
fn accepts_arbitrary_durations_not_on_the_listing_grid() {
    let provider_id = Uuid::new_v4();
    let hours = nine_to_five(provider_id);

    assert_matches!(
        check_reservation(provider_id, at(10, 5), 25, &[], Some(&hours)),
        Ok(())
    );
}

#[test]
fn rejects_nonpositive_durations() {
    let provider_id = Uuid::new_v4();
    let hours = nine_to_five(provider_id);

    assert_matches!(
        check_reservation(provider_id, at(10, 0), 0, &[], Some(&hours)),
        Err(SchedulingError::InvalidDuration(0))
    );
    assert_matches!(
        check_reservation(provider_id, at(10, 0), -30, &[], Some(&hours)),
        Err(SchedulingError::InvalidDuration(-30))
    );
}

#[test]
fn rejects_intervals_outside_the_working_window() {
    let provider_id = Uuid::new_v4();
    let hours = nine_to_five(provider_id);

    // Starts before opening.
    assert_matches!(
        check_reservation(provider_id, at(8, 30), 30, &[], Some(&hours)),
        Err(SchedulingError::OutsideWorkingHours)
    );
    // Ends after closing.
    assert_matches!(
        check_reservation(provider_id, at(16, 45), 30, &[], Some(&hours)),
        Err(SchedulingError::OutsideWorkingHours)
    );
}

#[test]
fn accepts_an_interval_ending_exactly_at_closing_time() {
    let provider_id = Uuid::new_v4();
    let hours = nine_to_five(provider_id);

    assert_matches!(
        check_reservation(provider_id, at(16, 30), 30, &[], Some(&hours)),
        Ok(())
    );
}

#[test]
fn rejects_when_the_template_is_absent_or_not_working() {
    let provider_id = Uuid::new_v4();
    let mut day_off = nine_to_five(provider_id);
    day_off.is_working = false;

    assert_matches!(
        check_reservation(provider_id, at(10, 0), 30, &[], None),
        Err(SchedulingError::OutsideWorkingHours)
    );
    assert_matches!(
        check_reservation(provider_id, at(10, 0), 30, &[], Some(&day_off)),
        Err(SchedulingError::OutsideWorkingHours)
    );
}

#[test]
fn rejects_intervals_crossing_midnight() {
    let provider_id = Uuid::new_v4();
    let hours = WorkingHours {
        provider_id,
        weekday: 0,
        start_time: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
        is_working: true,
    };

    assert_matches!(
        check_reservation(provider_id, at(23, 30), 60, &[], Some(&hours)),
        Err(SchedulingError::OutsideWorkingHours)
    );
}

#[test]
fn rejects_an_interval_contained_in_an_existing_reservation() {
    let provider_id = Uuid::new_v4();
    let hours = nine_to_five(provider_id);
    let existing = vec![confirmed(provider_id, at(10, 0), 60)];

    assert_matches!(
        check_reservation(provider_id, at(10, 15), 20, &existing, Some(&hours)),
        Err(SchedulingError::Conflict)
    );
}

#[test]
fn rejects_partial_overlaps_in_both_directions() {
    let provider_id = Uuid::new_v4();
    let hours = nine_to_five(provider_id);
    let existing = vec![confirmed(provider_id, at(10, 0), 60)];

    assert_matches!(
        check_reservation(provider_id, at(9, 45), 30, &existing, Some(&hours)),
        Err(SchedulingError::Conflict)
    );
    assert_matches!(
        check_reservation(provider_id, at(10, 45), 30, &existing, Some(&hours)),
        Err(SchedulingError::Conflict)
    );
}

#[test]
fn touching_intervals_do_not_conflict() {
    let provider_id = Uuid::new_v4();
    let hours = nine_to_five(provider_id);
    let existing = vec![confirmed(provider_id, at(10, 0), 60)];

    // Ends exactly where the existing one starts.
    assert_matches!(
        check_reservation(provider_id, at(9, 30), 30, &existing, Some(&hours)),
        Ok(())
    );
    // Starts exactly where the existing one ends.
    assert_matches!(
        check_reservation(provider_id, at(11, 0), 30, &existing, Some(&hours)),
        Ok(())
    );
}

#[test]
fn another_providers_reservation_is_ignored() {
    let provider_id = Uuid::new_v4();
    let hours = nine_to_five(provider_id);
    let existing = vec![confirmed(Uuid::new_v4(), at(10, 0), 60)];

    assert_matches!(
        check_reservation(provider_id, at(10, 0), 30, &existing, Some(&hours)),
        Ok(())
    );
}

#[test]
fn inactive_reservations_are_ignored() {
    let provider_id = Uuid::new_v4();
    let hours = nine_to_five(provider_id);
    let mut cancelled = confirmed(provider_id, at(10, 0), 60);
    cancelled.status = ReservationStatus::Cancelled;

    assert_matches!(
        check_reservation(provider_id, at(10, 0), 30, &[cancelled], Some(&hours)),
        Ok(())
    );
}
