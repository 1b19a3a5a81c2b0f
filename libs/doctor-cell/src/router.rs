// libs/doctor-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use crate::catalog::DoctorCatalog;
use crate::handlers;

pub fn doctor_routes(catalog: Arc<DoctorCatalog>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .with_state(catalog)
}
