// libs/scheduling-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveTime};
use std::fmt;
use thiserror::Error;

// ==============================================================================
// CORE SCHEDULING MODELS
// ==============================================================================

/// Recurring weekly working-hours template, one row per weekday per provider.
/// Owned by provider management; the scheduling engine only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHours {
    pub provider_id: Uuid,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_working: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: ReservationStatus,
    pub client_ref: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Exclusive end of the reserved interval: [start_time, end_time).
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + chrono::Duration::minutes(self.duration_minutes as i64)
    }

    /// Whether this reservation participates in conflict checks.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Fields of a reservation the caller supplies; the ledger assigns id and
/// timestamps at commit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    pub provider_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: ReservationStatus,
    pub client_ref: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl ReservationStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Cancelled
                | ReservationStatus::Completed
                | ReservationStatus::NoShow
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "pending"),
            ReservationStatus::Confirmed => write!(f, "confirmed"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
            ReservationStatus::Completed => write!(f, "completed"),
            ReservationStatus::NoShow => write!(f, "no_show"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveRequest {
    pub provider_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub client_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReservationStatusRequest {
    pub status: ReservationStatus,
    pub reason: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Provider not found")]
    ProviderNotFound,

    #[error("Reservation not found")]
    ReservationNotFound,

    #[error("Invalid duration: {0} minutes")]
    InvalidDuration(i32),

    #[error("Requested time is outside the provider's working hours")]
    OutsideWorkingHours,

    #[error("Requested time conflicts with an existing reservation")]
    Conflict,

    #[error("Reservation cannot change status from {0}")]
    InvalidStatusTransition(ReservationStatus),

    #[error("Timed out waiting for the provider's booking lock")]
    LockTimeout,

    #[error("Storage denied access: {0}")]
    PermissionDenied(String),

    #[error("Storage rejected the request: {0}")]
    StorageRejected(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl SchedulingError {
    /// Transient failures are retried inside the reservation transaction;
    /// every other variant is surfaced to the caller unchanged. A denied or
    /// rejected storage request is deterministic and never retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, SchedulingError::LockTimeout | SchedulingError::Storage(_))
    }
}

impl From<SchedulingError> for shared_models::error::AppError {
    fn from(e: SchedulingError) -> Self {
        use shared_models::error::AppError;
        match e {
            SchedulingError::ProviderNotFound | SchedulingError::ReservationNotFound => {
                AppError::NotFound(e.to_string())
            }
            SchedulingError::InvalidDuration(_)
            | SchedulingError::OutsideWorkingHours
            | SchedulingError::InvalidStatusTransition(_) => AppError::ValidationError(e.to_string()),
            SchedulingError::Conflict => AppError::Conflict(e.to_string()),
            SchedulingError::PermissionDenied(_) => AppError::Auth(e.to_string()),
            SchedulingError::StorageRejected(_) => AppError::Internal(e.to_string()),
            SchedulingError::LockTimeout | SchedulingError::Storage(_) => {
                AppError::Unavailable(e.to_string())
            }
        }
    }
}
