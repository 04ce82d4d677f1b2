// libs/scheduling-cell/src/services/lifecycle.rs
//
// Status transitions after creation (cancel, complete, no-show). These
// belong to booking management, not to the scheduling engine: they only
// ever flip status and never create or move an interval.

use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{Reservation, ReservationStatus, SchedulingError};
use crate::repository::BookingLedger;

pub struct ReservationLifecycleService {
    ledger: Arc<dyn BookingLedger>,
}

impl ReservationLifecycleService {
    pub fn new(ledger: Arc<dyn BookingLedger>) -> Self {
        Self { ledger }
    }

    /// Valid next statuses. Terminal states admit none; a pending
    /// reservation can only be abandoned (there is no provider-approval
    /// step that would confirm it).
    pub fn valid_transitions(current: ReservationStatus) -> &'static [ReservationStatus] {
        match current {
            ReservationStatus::Pending => {
                &[ReservationStatus::Cancelled, ReservationStatus::NoShow]
            }
            ReservationStatus::Confirmed => &[
                ReservationStatus::Cancelled,
                ReservationStatus::Completed,
                ReservationStatus::NoShow,
            ],
            ReservationStatus::Cancelled
            | ReservationStatus::Completed
            | ReservationStatus::NoShow => &[],
        }
    }

    pub fn validate_status_transition(
        current: ReservationStatus,
        next: ReservationStatus,
    ) -> Result<(), SchedulingError> {
        if !Self::valid_transitions(current).contains(&next) {
            warn!("Invalid status transition attempted: {} -> {}", current, next);
            return Err(SchedulingError::InvalidStatusTransition(current));
        }
        Ok(())
    }

    /// Read, validate, and persist one status transition.
    pub async fn transition(
        &self,
        reservation_id: Uuid,
        next: ReservationStatus,
    ) -> Result<Reservation, SchedulingError> {
        let current = self.ledger.get_reservation(reservation_id).await?;
        Self::validate_status_transition(current.status, next)?;

        let updated = self.ledger.update_status(reservation_id, next).await?;
        debug!(
            "Reservation {} moved from {} to {}",
            reservation_id, current.status, updated.status
        );
        Ok(updated)
    }
}
