use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use scheduling_cell::SchedulingState;
use scheduling_cell::router::scheduling_routes;

pub fn create_router(state: Arc<SchedulingState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Booking platform API is running!" }))
        .route("/health", get(|| async { "ok" }))
        .nest("/api/v1/scheduling", scheduling_routes(state))
}
