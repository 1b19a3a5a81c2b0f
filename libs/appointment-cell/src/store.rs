// libs/appointment-cell/src/store.rs
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use doctor_cell::models::Doctor;

use crate::models::{Appointment, AppointmentStatus, BookingError, Patient};
use crate::services::lifecycle;

/// Shape of the persisted JSON document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    pub appointments: Vec<Appointment>,
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreCounts {
    pub appointments: usize,
    pub patients: usize,
}

/// Repository seam for appointment persistence. Business logic only talks
/// to this trait, so the backing collection (in-memory, file snapshot, a
/// real database later) is swappable without touching the workflow code.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    fn next_appointment_id(&self) -> String;
    fn next_patient_id(&self) -> String;

    /// Atomic insert-if-absent keyed on the conflict tuples. The duplicate
    /// check `(patientPhone, doctorId, date, time)` runs first so that a
    /// resubmission by the same patient is reported as a duplicate, then
    /// the slot check `(doctorId, date, time, status != cancelled)`. Both
    /// checks, the insert, and the patient upsert happen under one write
    /// guard so concurrent submissions cannot interleave.
    async fn create_checked(
        &self,
        appointment: Appointment,
        patient: Patient,
    ) -> Result<Appointment, BookingError>;

    async fn get(&self, id: &str) -> Option<Appointment>;
    async fn list(&self) -> Vec<Appointment>;

    /// Applies the lifecycle transition graph and refreshes `updatedAt`.
    async fn update_status(
        &self,
        id: &str,
        target: AppointmentStatus,
    ) -> Result<Appointment, BookingError>;

    /// Unconditional hard delete, independent of status. A failed snapshot
    /// rolls the removal back and surfaces as a storage error.
    async fn delete(&self, id: &str) -> Result<Appointment, BookingError>;

    async fn find_by_phone(&self, phone: &str) -> Vec<Appointment>;
    async fn find_by_date(&self, date: &str) -> Vec<Appointment>;

    /// Times of non-cancelled appointments for (doctor, date).
    async fn booked_times(&self, doctor_id: i64, date: &str) -> Vec<String>;

    async fn counts(&self) -> StoreCounts;
}

struct StoreInner {
    appointments: Vec<Appointment>,
    patients: Vec<Patient>,
    doctors: Vec<Doctor>,
}

/// In-memory store, optionally snapshotted to a single JSON document.
/// The snapshot is rewritten whole after every mutation, to a temp file in
/// the target directory followed by an atomic rename, so the document on
/// disk is never partially written.
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
    data_file: Option<PathBuf>,
    id_floor: AtomicI64,
}

impl MemoryStore {
    pub fn new(doctors: Vec<Doctor>) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                appointments: Vec::new(),
                patients: Vec::new(),
                doctors,
            }),
            data_file: None,
            id_floor: AtomicI64::new(0),
        }
    }

    /// Opens a file-backed store, loading any existing document at `path`.
    /// The doctor roster always comes from the seed; the persisted copy is
    /// written back for document completeness but not read as state.
    pub fn with_data_file(doctors: Vec<Doctor>, path: PathBuf) -> anyhow::Result<Self> {
        let (appointments, patients) = if path.exists() {
            let raw = std::fs::read(&path)
                .with_context(|| format!("failed to read data file {}", path.display()))?;
            let document: StoreDocument = serde_json::from_slice(&raw)
                .with_context(|| format!("malformed data file {}", path.display()))?;
            info!(
                "loaded {} appointments and {} patients from {}",
                document.appointments.len(),
                document.patients.len(),
                path.display()
            );
            (document.appointments, document.patients)
        } else {
            info!("data file {} does not exist yet, starting empty", path.display());
            (Vec::new(), Vec::new())
        };

        // Ids issued after a restart must stay above everything already on disk.
        let id_floor = appointments
            .iter()
            .map(|a| a.id.as_str())
            .chain(patients.iter().map(|p| p.id.as_str()))
            .filter_map(numeric_suffix)
            .max()
            .unwrap_or(0);

        Ok(Self {
            inner: RwLock::new(StoreInner {
                appointments,
                patients,
                doctors,
            }),
            data_file: Some(path),
            id_floor: AtomicI64::new(id_floor),
        })
    }

    /// Timestamp-derived id with a monotonic floor, unique for the life of
    /// the process even when two ids are issued within one millisecond.
    fn next_id(&self, prefix: &str) -> String {
        let now = Utc::now().timestamp_millis();
        let mut floor = self.id_floor.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(floor + 1);
            match self.id_floor.compare_exchange(
                floor,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return format!("{}{}", prefix, candidate),
                Err(actual) => floor = actual,
            }
        }
    }

    /// Whole-document rewrite via temp file + atomic rename. Called while
    /// the write guard is held, so file access is exclusive.
    fn snapshot(&self, inner: &StoreInner) -> Result<(), BookingError> {
        let Some(path) = &self.data_file else {
            return Ok(());
        };

        let document = StoreDocument {
            appointments: inner.appointments.clone(),
            doctors: inner.doctors.clone(),
            patients: inner.patients.clone(),
        };

        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
            .map_err(|e| BookingError::Storage(e.to_string()))?;
        serde_json::to_writer_pretty(tmp.as_file(), &document)
            .map_err(|e| BookingError::Storage(e.to_string()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| BookingError::Storage(e.to_string()))?;
        tmp.persist(path)
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        debug!("snapshot written to {}", path.display());
        Ok(())
    }
}

fn numeric_suffix(id: &str) -> Option<i64> {
    id.trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .ok()
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    fn next_appointment_id(&self) -> String {
        self.next_id("APT")
    }

    fn next_patient_id(&self) -> String {
        self.next_id("PAT")
    }

    async fn create_checked(
        &self,
        appointment: Appointment,
        patient: Patient,
    ) -> Result<Appointment, BookingError> {
        let mut inner = self.inner.write().await;

        let duplicate = inner.appointments.iter().any(|a| {
            a.patient_phone == appointment.patient_phone
                && a.doctor_id == appointment.doctor_id
                && a.date == appointment.date
                && a.time == appointment.time
        });
        if duplicate {
            return Err(BookingError::DuplicateBooking);
        }

        let slot_taken = inner.appointments.iter().any(|a| {
            a.doctor_id == appointment.doctor_id
                && a.date == appointment.date
                && a.time == appointment.time
                && a.status != AppointmentStatus::Cancelled
        });
        if slot_taken {
            return Err(BookingError::SlotTaken);
        }

        inner.appointments.push(appointment.clone());

        let patient_added = !inner.patients.iter().any(|p| p.phone == patient.phone);
        if patient_added {
            inner.patients.push(patient);
        }

        if let Err(e) = self.snapshot(&inner) {
            // Keep memory and disk in agreement: undo the insert.
            inner.appointments.pop();
            if patient_added {
                inner.patients.pop();
            }
            return Err(e);
        }

        Ok(appointment)
    }

    async fn get(&self, id: &str) -> Option<Appointment> {
        let inner = self.inner.read().await;
        inner.appointments.iter().find(|a| a.id == id).cloned()
    }

    async fn list(&self) -> Vec<Appointment> {
        let inner = self.inner.read().await;
        inner.appointments.clone()
    }

    async fn update_status(
        &self,
        id: &str,
        target: AppointmentStatus,
    ) -> Result<Appointment, BookingError> {
        let mut inner = self.inner.write().await;

        let idx = inner
            .appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or(BookingError::AppointmentNotFound)?;

        let current = inner.appointments[idx].status;
        lifecycle::validate_transition(current, target)?;

        let previous_updated_at = inner.appointments[idx].updated_at;
        inner.appointments[idx].status = target;
        inner.appointments[idx].updated_at = Utc::now();

        if let Err(e) = self.snapshot(&inner) {
            inner.appointments[idx].status = current;
            inner.appointments[idx].updated_at = previous_updated_at;
            return Err(e);
        }

        Ok(inner.appointments[idx].clone())
    }

    async fn delete(&self, id: &str) -> Result<Appointment, BookingError> {
        let mut inner = self.inner.write().await;

        let idx = inner
            .appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or(BookingError::AppointmentNotFound)?;
        let removed = inner.appointments.remove(idx);

        if let Err(e) = self.snapshot(&inner) {
            // Keep memory and disk in agreement: undo the removal.
            inner.appointments.insert(idx, removed);
            return Err(e);
        }

        Ok(removed)
    }

    async fn find_by_phone(&self, phone: &str) -> Vec<Appointment> {
        let inner = self.inner.read().await;
        inner
            .appointments
            .iter()
            .filter(|a| a.patient_phone == phone)
            .cloned()
            .collect()
    }

    async fn find_by_date(&self, date: &str) -> Vec<Appointment> {
        let inner = self.inner.read().await;
        inner
            .appointments
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect()
    }

    async fn booked_times(&self, doctor_id: i64, date: &str) -> Vec<String> {
        let inner = self.inner.read().await;
        inner
            .appointments
            .iter()
            .filter(|a| {
                a.doctor_id == doctor_id
                    && a.date == date
                    && a.status != AppointmentStatus::Cancelled
            })
            .map(|a| a.time.clone())
            .collect()
    }

    async fn counts(&self) -> StoreCounts {
        let inner = self.inner.read().await;
        StoreCounts {
            appointments: inner.appointments.len(),
            patients: inner.patients.len(),
        }
    }
}
