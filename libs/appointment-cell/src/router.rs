// libs/appointment-cell/src/router.rs
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/affiliate/{affiliate_id}", get(handlers::get_affiliate_appointments))
        .route("/specialist/{specialist_id}", get(handlers::get_specialist_appointments))
        .route("/{appointment_id}/confirm", patch(handlers::confirm_appointment))
        .route("/{appointment_id}/cancel", patch(handlers::cancel_appointment))
        .route("/{appointment_id}/complete", patch(handlers::complete_appointment))
        .route("/{appointment_id}/absent", patch(handlers::mark_appointment_absent))
        .route("/{appointment_id}/derive", post(handlers::derive_appointment))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}

pub fn penalty_routes(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/", get(handlers::list_penalties))
        .route("/affiliate/{affiliate_id}", get(handlers::list_affiliate_penalties))
        .route("/{penalty_id}", delete(handlers::lift_penalty))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
