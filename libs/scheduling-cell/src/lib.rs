pub mod handlers;
pub mod router;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;

pub use models::*;
pub use state::SchedulingState;
