use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::json;

use appointment_cell::handlers::AppState;
use appointment_cell::router::{appointment_routes, system_routes};
use doctor_cell::router::doctor_routes;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(|| async { "Hospital Appointment System API is running!" }),
        )
        .nest("/api/doctors", doctor_routes(state.catalog.clone()))
        .nest("/api/appointments", appointment_routes(state.clone()))
        .nest("/api", system_routes(state))
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "message": "Endpoint not found" })),
            )
        })
}
