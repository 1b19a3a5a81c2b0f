// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::catalog::DoctorCatalog;
use crate::models::Department;

#[derive(Debug, Deserialize)]
pub struct DoctorListParams {
    pub department: Option<String>,
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(catalog): State<Arc<DoctorCatalog>>,
    Query(params): Query<DoctorListParams>,
) -> Result<Json<Value>, AppError> {
    let filter = match params.department.as_deref() {
        Some(raw) => Some(
            Department::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown department: {}", raw)))?,
        ),
        None => None,
    };

    let doctors = catalog.list(filter);

    Ok(Json(json!({
        "success": true,
        "count": doctors.len(),
        "data": doctors
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(catalog): State<Arc<DoctorCatalog>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let doctor = catalog
        .get(doctor_id)
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": doctor
    })))
}
