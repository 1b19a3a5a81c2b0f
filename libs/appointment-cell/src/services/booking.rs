// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::Utc;
use regex::Regex;
use tracing::{debug, info};

use doctor_cell::catalog::DoctorCatalog;
use doctor_cell::models::Department;

use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, BookingError, Patient,
};
use crate::store::AppointmentRepository;

/// The booking workflow: validate the request, resolve the doctor, check
/// slot legality, then commit through the store's atomic insert. Nothing is
/// written until every check has passed, so no rollback is ever needed.
pub struct BookingService {
    catalog: Arc<DoctorCatalog>,
    store: Arc<dyn AppointmentRepository>,
}

/// Booking fields after required/format validation.
struct ValidatedBooking {
    patient_name: String,
    phone: String,
    email: String,
    date: String,
    time: String,
    doctor_id: i64,
    symptoms: String,
}

impl BookingService {
    pub fn new(catalog: Arc<DoctorCatalog>, store: Arc<dyn AppointmentRepository>) -> Self {
        Self { catalog, store }
    }

    pub async fn submit_booking(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, BookingError> {
        let fields = validate_fields(&request)?;
        debug!(
            "booking request for doctor {} on {} at {}",
            fields.doctor_id, fields.date, fields.time
        );

        let doctor = self
            .catalog
            .get(fields.doctor_id)
            .ok_or(BookingError::DoctorNotFound)?;

        if !doctor.working_hours.iter().any(|slot| slot == &fields.time) {
            return Err(BookingError::SlotOutsideWorkingHours(fields.time));
        }

        // The department snapshot defaults to the doctor's own department
        // when the request leaves it out.
        let department = match request.department.as_deref().filter(|raw| !raw.is_empty()) {
            Some(raw) => {
                Department::parse(raw).ok_or_else(|| BookingError::UnknownDepartment(raw.to_string()))?
            }
            None => doctor.department,
        };

        let now = Utc::now();
        let appointment = Appointment {
            id: self.store.next_appointment_id(),
            patient_name: fields.patient_name.clone(),
            patient_phone: fields.phone.clone(),
            patient_email: fields.email.clone(),
            date: fields.date,
            time: fields.time,
            doctor_id: doctor.id,
            doctor_name: doctor.name.clone(),
            department,
            symptoms: fields.symptoms,
            status: AppointmentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let patient = Patient {
            id: self.store.next_patient_id(),
            name: fields.patient_name,
            phone: fields.phone,
            email: fields.email,
            created_at: now,
        };

        // Conflict and duplicate checks run inside the store's write guard,
        // so two racing submissions cannot both pass them.
        let created = self.store.create_checked(appointment, patient).await?;

        info!(
            "appointment {} booked with doctor {} on {} at {}",
            created.id, created.doctor_id, created.date, created.time
        );
        Ok(created)
    }
}

fn validate_fields(request: &BookAppointmentRequest) -> Result<ValidatedBooking, BookingError> {
    let patient_name = non_empty(&request.patient_name).ok_or(BookingError::MissingFields)?;
    let phone = non_empty(&request.phone).ok_or(BookingError::MissingFields)?;
    let date = non_empty(&request.date).ok_or(BookingError::MissingFields)?;
    let time = non_empty(&request.time).ok_or(BookingError::MissingFields)?;
    let doctor_id = request.doctor_id.ok_or(BookingError::MissingFields)?;

    // Local mobile number: leading 0, then 6 or 7, then 8 more digits.
    let phone_regex = Regex::new(r"^0[67][0-9]{8}$").unwrap();
    if !phone_regex.is_match(&phone) {
        return Err(BookingError::InvalidPhone);
    }

    let email = request.email.clone().unwrap_or_default();
    if !email.is_empty() {
        let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
        if !email_regex.is_match(&email) {
            return Err(BookingError::InvalidEmail);
        }
    }

    Ok(ValidatedBooking {
        patient_name,
        phone,
        email,
        date,
        time,
        doctor_id,
        symptoms: request.symptoms.clone().unwrap_or_default(),
    })
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
