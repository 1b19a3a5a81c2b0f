// libs/appointment-cell/src/services/availability.rs
use std::sync::Arc;

use tracing::debug;

use doctor_cell::catalog::DoctorCatalog;

use crate::models::{BookingError, DayAvailability};
use crate::store::AppointmentRepository;

/// Computes the bookable slots for a doctor on a given date: the doctor's
/// working-hour template minus the non-cancelled bookings already held.
pub struct AvailabilityService {
    catalog: Arc<DoctorCatalog>,
    store: Arc<dyn AppointmentRepository>,
}

impl AvailabilityService {
    pub fn new(catalog: Arc<DoctorCatalog>, store: Arc<dyn AppointmentRepository>) -> Self {
        Self { catalog, store }
    }

    /// An unknown doctor is a NotFound, never an empty template: reporting
    /// all slots open for a doctor that does not exist would be worse than
    /// an error. Both returned sequences preserve template order.
    pub async fn day_availability(
        &self,
        doctor_id: i64,
        date: &str,
    ) -> Result<DayAvailability, BookingError> {
        let doctor = self
            .catalog
            .get(doctor_id)
            .ok_or(BookingError::DoctorNotFound)?;

        let booked = self.store.booked_times(doctor_id, date).await;
        debug!(
            "doctor {} has {} booked slot(s) on {}",
            doctor_id,
            booked.len(),
            date
        );

        let booked_slots: Vec<String> = doctor
            .working_hours
            .iter()
            .filter(|slot| booked.iter().any(|b| b == *slot))
            .cloned()
            .collect();
        let available_slots: Vec<String> = doctor
            .working_hours
            .iter()
            .filter(|slot| !booked.iter().any(|b| b == *slot))
            .cloned()
            .collect();

        Ok(DayAvailability {
            available_slots,
            booked_slots,
        })
    }
}
