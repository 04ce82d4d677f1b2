// libs/scheduling-cell/src/repository.rs
//
// Explicit storage seams for the scheduling engine. The engine never talks
// to storage directly; it receives these interfaces from the caller.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{NewReservation, Reservation, ReservationStatus, SchedulingError, WorkingHours};

pub mod memory;
pub mod supabase;

pub use memory::{InMemoryBookingLedger, InMemoryScheduleRepository};
pub use supabase::{SupabaseBookingLedger, SupabaseScheduleRepository};

/// Read-only source of a provider's recurring weekly working hours.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn provider_exists(&self, provider_id: Uuid) -> Result<bool, SchedulingError>;

    /// Template for one weekday (0 = Monday .. 6 = Sunday), if any.
    async fn get_working_hours(
        &self,
        provider_id: Uuid,
        weekday: u8,
    ) -> Result<Option<WorkingHours>, SchedulingError>;
}

/// Durable store of reservations. `insert_reservation` commits atomically:
/// either the returned reservation is fully persisted or nothing is.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Reservations with status pending or confirmed whose interval starts
    /// on `date` (UTC), in chronological order.
    async fn get_active_reservations(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, SchedulingError>;

    /// Every reservation whose interval starts on `date` (UTC), terminal
    /// statuses included, in chronological order.
    async fn get_reservations_for_day(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, SchedulingError>;

    async fn insert_reservation(
        &self,
        reservation: NewReservation,
    ) -> Result<Reservation, SchedulingError>;

    async fn get_reservation(&self, reservation_id: Uuid) -> Result<Reservation, SchedulingError>;

    async fn update_status(
        &self,
        reservation_id: Uuid,
        status: ReservationStatus,
    ) -> Result<Reservation, SchedulingError>;
}
