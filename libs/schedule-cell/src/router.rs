// libs/schedule-cell/src/router.rs
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn schedule_routes(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_schedule))
        .route("/specialist/{specialist_id}", get(handlers::get_specialist_schedules))
        .route("/available-slots", get(handlers::get_available_slots))
        .route("/{schedule_id}", put(handlers::update_schedule))
        .route("/{schedule_id}/deactivate", delete(handlers::deactivate_schedule))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}

pub fn unavailability_routes(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_unavailability))
        .route(
            "/specialist/{specialist_id}",
            get(handlers::get_specialist_unavailability),
        )
        .route("/{window_id}", delete(handlers::delete_unavailability))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
