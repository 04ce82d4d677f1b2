// libs/scheduling-cell/tests/availability_test.rs
//
// End-to-end listing behavior over the in-memory repositories.

use assert_matches::assert_matches;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use scheduling_cell::models::{SchedulingError, WorkingHours};
use scheduling_cell::repository::{InMemoryBookingLedger, InMemoryScheduleRepository};
use scheduling_cell::services::availability::AvailabilityService;
use scheduling_cell::services::reservation::{ProviderLockRegistry, ReservationService};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 23).unwrap()
}

fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 24).unwrap()
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    date.and_hms_opt(hour, minute, 0).unwrap().and_utc()
}

struct TestSetup {
    schedule: Arc<InMemoryScheduleRepository>,
    ledger: Arc<InMemoryBookingLedger>,
    provider_id: Uuid,
}

impl TestSetup {
    /// Provider working 09:00-17:00 on Mondays only.
    async fn new() -> Self {
        let schedule = Arc::new(InMemoryScheduleRepository::new());
        let provider_id = Uuid::new_v4();
        schedule
            .set_working_hours(WorkingHours {
                provider_id,
                weekday: 0,
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                is_working: true,
            })
            .await;
        Self {
            schedule,
            ledger: Arc::new(InMemoryBookingLedger::new()),
            provider_id,
        }
    }

    fn availability(&self) -> AvailabilityService {
        AvailabilityService::new(self.schedule.clone(), self.ledger.clone())
    }

    fn reservations(&self) -> ReservationService {
        ReservationService::new(
            self.schedule.clone(),
            self.ledger.clone(),
            Arc::new(ProviderLockRegistry::new()),
        )
    }
}

#[tokio::test]
async fn an_empty_monday_lists_all_sixteen_slots() {
    let setup = TestSetup::new().await;

    let slots = setup
        .availability()
        .list_available_slots(setup.provider_id, monday(), 30)
        .await
        .unwrap();

    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0], at(monday(), 9, 0));
    assert_eq!(slots[15], at(monday(), 16, 30));
}

#[tokio::test]
async fn a_booked_slot_disappears_from_the_listing() {
    let setup = TestSetup::new().await;

    setup
        .reservations()
        .reserve(setup.provider_id, at(monday(), 10, 0), 30, "client-1")
        .await
        .unwrap();

    let slots = setup
        .availability()
        .list_available_slots(setup.provider_id, monday(), 30)
        .await
        .unwrap();

    assert_eq!(slots.len(), 15);
    assert!(!slots.contains(&at(monday(), 10, 0)));
    assert_eq!(slots[0], at(monday(), 9, 0));
    assert_eq!(slots[1], at(monday(), 9, 30));
    assert_eq!(slots[2], at(monday(), 10, 30));
}

#[tokio::test]
async fn a_day_without_a_template_lists_nothing() {
    let setup = TestSetup::new().await;

    let slots = setup
        .availability()
        .list_available_slots(setup.provider_id, tuesday(), 30)
        .await
        .unwrap();

    assert!(slots.is_empty());
}

#[tokio::test]
async fn an_unknown_provider_lists_nothing() {
    let setup = TestSetup::new().await;

    let slots = setup
        .availability()
        .list_available_slots(Uuid::new_v4(), monday(), 30)
        .await
        .unwrap();

    assert!(slots.is_empty());
}

#[tokio::test]
async fn listing_rejects_a_nonpositive_granularity() {
    let setup = TestSetup::new().await;

    assert_matches!(
        setup
            .availability()
            .list_available_slots(setup.provider_id, monday(), 0)
            .await,
        Err(SchedulingError::InvalidDuration(0))
    );
}

#[tokio::test]
async fn repeated_listings_without_writes_are_identical() {
    let setup = TestSetup::new().await;

    setup
        .reservations()
        .reserve(setup.provider_id, at(monday(), 11, 0), 30, "client-1")
        .await
        .unwrap();

    let first = setup
        .availability()
        .list_available_slots(setup.provider_id, monday(), 30)
        .await
        .unwrap();
    let second = setup
        .availability()
        .list_available_slots(setup.provider_id, monday(), 30)
        .await
        .unwrap();

    assert_eq!(first, second);
}
