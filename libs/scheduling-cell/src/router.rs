// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::SchedulingState;

pub fn scheduling_routes(state: Arc<SchedulingState>) -> Router {
    Router::new()
        .route("/providers/{provider_id}/slots", get(handlers::list_available_slots))
        .route("/providers/{provider_id}/reservations", get(handlers::list_provider_reservations))
        .route("/reservations", post(handlers::reserve))
        .route("/reservations/{reservation_id}", get(handlers::get_reservation))
        .route("/reservations/{reservation_id}/cancel", post(handlers::cancel_reservation))
        .route("/reservations/{reservation_id}/status", post(handlers::update_reservation_status))
        .with_state(state)
}
