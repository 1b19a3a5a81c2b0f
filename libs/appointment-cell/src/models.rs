// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use doctor_cell::models::Department;
use shared_models::error::AppError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A booked appointment. `doctor_name` and `department` are deliberate
/// snapshots taken at booking time, not live references into the catalog.
/// `date` and `time` are opaque strings compared by exact equality; no
/// timezone normalization is performed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_email: String,
    pub date: String,
    pub time: String,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub department: Department,
    pub symptoms: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(AppointmentStatus::Pending),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A patient record, keyed by phone number. Created as a side effect of a
/// first booking; never updated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Raw booking payload. Every field is optional here so that missing fields
/// produce the workflow's own 400 message instead of a deserializer error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub patient_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub doctor_id: Option<i64>,
    pub department: Option<String>,
    pub symptoms: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub available_slots: Vec<String>,
    pub booked_slots: Vec<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("Missing required fields: patientName, phone, date, time, doctorId")]
    MissingFields,

    #[error("Invalid phone number: expected 10 digits starting with 06 or 07")]
    InvalidPhone,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Unknown department: {0}")]
    UnknownDepartment(String),

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Time {0} is outside the doctor's working hours")]
    SlotOutsideWorkingHours(String),

    #[error("Time slot is already booked for this doctor")]
    SlotTaken,

    #[error("Appointment already exists for this patient at the same time")]
    DuplicateBooking,

    #[error("Invalid status. Must be: pending, confirmed, completed, or cancelled")]
    InvalidStatus,

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::DoctorNotFound | BookingError::AppointmentNotFound => {
                AppError::NotFound(err.to_string())
            }
            BookingError::SlotTaken | BookingError::DuplicateBooking => {
                AppError::Conflict(err.to_string())
            }
            BookingError::Storage(detail) => AppError::Internal(detail),
            other => AppError::Validation(other.to_string()),
        }
    }
}
