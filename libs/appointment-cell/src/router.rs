// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::{self, AppState};

/// Appointment CRUD and queries, mounted at `/api/appointments`.
pub fn appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_appointments).post(handlers::book_appointment),
        )
        .route("/today", get(handlers::today_appointments))
        .route("/search/{phone}", get(handlers::search_by_phone))
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment).delete(handlers::delete_appointment),
        )
        .route("/{appointment_id}/status", put(handlers::update_status))
        .with_state(state)
}

/// Health, stats and availability, mounted at `/api`.
pub fn system_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .route(
            "/availability/{doctor_id}/{date}",
            get(handlers::day_availability),
        )
        .with_state(state)
}
