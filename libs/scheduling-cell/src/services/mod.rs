pub mod availability;
pub mod cache;
pub mod conflict;
pub mod lifecycle;
pub mod reservation;
pub mod slots;

pub use availability::AvailabilityService;
pub use cache::AvailabilityCache;
pub use lifecycle::ReservationLifecycleService;
pub use reservation::{ProviderLockRegistry, ReservationService};
