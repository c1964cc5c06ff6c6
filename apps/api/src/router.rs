use axum::{routing::get, Router};

use appointment_cell::router::{appointment_routes, penalty_routes};
use schedule_cell::router::{schedule_routes, unavailability_routes};
use shared_database::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Medinet appointment API is running!" }))
        .nest("/schedules", schedule_routes(state.clone()))
        .nest("/unavailability", unavailability_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/penalties", penalty_routes(state))
}
