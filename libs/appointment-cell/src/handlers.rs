// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use doctor_cell::catalog::DoctorCatalog;
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    AppointmentStatus, BookAppointmentRequest, BookingError, UpdateStatusRequest,
};
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingService;
use crate::store::AppointmentRepository;

/// Shared application state: configuration, the doctor catalog, the
/// appointment store, and the process start instant for the health report.
/// `version` is the binary crate's version, injected at startup so the
/// health payload reports the service version rather than this library's.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<DoctorCatalog>,
    pub store: Arc<dyn AppointmentRepository>,
    pub started_at: Instant,
    pub version: &'static str,
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let booking_service = BookingService::new(state.catalog.clone(), state.store.clone());
    let appointment = booking_service.submit_booking(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Appointment created successfully",
            "data": appointment
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let appointments = state.store.list().await;

    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "data": appointments
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .store
        .get(&appointment_id)
        .await
        .ok_or(BookingError::AppointmentNotFound)?;

    Ok(Json(json!({
        "success": true,
        "data": appointment
    })))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let target = request
        .status
        .as_deref()
        .and_then(AppointmentStatus::parse)
        .ok_or(BookingError::InvalidStatus)?;

    let appointment = state.store.update_status(&appointment_id, target).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Appointment {} successfully", target),
        "data": appointment
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.store.delete(&appointment_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted successfully",
        "data": appointment
    })))
}

#[axum::debug_handler]
pub async fn search_by_phone(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointments = state.store.find_by_phone(&phone).await;

    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "data": appointments
    })))
}

#[axum::debug_handler]
pub async fn today_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let appointments = state.store.find_by_date(&today).await;

    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "data": appointments
    })))
}

#[axum::debug_handler]
pub async fn day_availability(
    State(state): State<Arc<AppState>>,
    Path((doctor_id, date)): Path<(i64, String)>,
) -> Result<Json<Value>, AppError> {
    let availability_service =
        AvailabilityService::new(state.catalog.clone(), state.store.clone());
    let day = availability_service.day_availability(doctor_id, &date).await?;

    Ok(Json(json!({
        "success": true,
        "doctorId": doctor_id,
        "date": date,
        "availableSlots": day.available_slots,
        "bookedSlots": day.booked_slots
    })))
}

#[axum::debug_handler]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let counts = state.store.counts().await;

    Json(json!({
        "status": "healthy",
        "service": "Hospital Appointment System",
        "version": state.version,
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "appointments": counts.appointments,
        "patients": counts.patients
    }))
}

#[axum::debug_handler]
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let appointments = state.store.list().await;
    let counts = state.store.counts().await;
    let today = Utc::now().format("%Y-%m-%d").to_string();

    let by_status = |status: AppointmentStatus| {
        appointments.iter().filter(|a| a.status == status).count()
    };

    Ok(Json(json!({
        "success": true,
        "data": {
            "totalAppointments": appointments.len(),
            "pending": by_status(AppointmentStatus::Pending),
            "confirmed": by_status(AppointmentStatus::Confirmed),
            "completed": by_status(AppointmentStatus::Completed),
            "cancelled": by_status(AppointmentStatus::Cancelled),
            "totalPatients": counts.patients,
            "totalDoctors": state.catalog.len(),
            "todayAppointments": appointments.iter().filter(|a| a.date == today).count()
        }
    })))
}
