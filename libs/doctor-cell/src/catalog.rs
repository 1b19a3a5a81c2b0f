// libs/doctor-cell/src/catalog.rs
use tracing::debug;

use crate::models::{Department, Doctor, WORKING_HOURS};

/// Read-only roster of doctors. Seeded at startup and never mutated;
/// runtime create/update of doctors is out of scope.
pub struct DoctorCatalog {
    doctors: Vec<Doctor>,
}

impl DoctorCatalog {
    /// The reference roster: one doctor per department.
    pub fn seeded() -> Self {
        let seed = [
            (1, "Dr. John Mwamba", "General Medicine", Department::General),
            (2, "Dr. Sarah Chuma", "Pediatrics", Department::Pediatrics),
            (3, "Dr. Robert Kimani", "Surgery", Department::Surgery),
            (4, "Dr. Grace Mwenda", "Dentistry", Department::Dental),
            (5, "Dr. David Omondi", "Eye Care", Department::Eye),
            (6, "Dr. Mary Achieng", "Maternity", Department::Maternity),
        ];

        let doctors = seed
            .into_iter()
            .map(|(id, name, specialty, department)| Doctor {
                id,
                name: name.to_string(),
                specialty: specialty.to_string(),
                department,
                working_hours: WORKING_HOURS.iter().map(|s| s.to_string()).collect(),
                available: true,
            })
            .collect();

        Self { doctors }
    }

    pub fn get(&self, id: i64) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == id)
    }

    pub fn list(&self, department: Option<Department>) -> Vec<&Doctor> {
        debug!("listing doctors, filter: {:?}", department);
        self.doctors
            .iter()
            .filter(|d| department.map_or(true, |dep| d.department == dep))
            .collect()
    }

    /// Owned copy of the roster, used to seed the persisted document.
    pub fn roster(&self) -> Vec<Doctor> {
        self.doctors.clone()
    }

    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_catalog_has_one_doctor_per_department() {
        let catalog = DoctorCatalog::seeded();
        assert_eq!(catalog.len(), 6);

        for department in [
            Department::General,
            Department::Pediatrics,
            Department::Surgery,
            Department::Dental,
            Department::Eye,
            Department::Maternity,
        ] {
            assert_eq!(catalog.list(Some(department)).len(), 1);
        }
    }

    #[test]
    fn get_resolves_known_ids_only() {
        let catalog = DoctorCatalog::seeded();
        assert_eq!(catalog.get(1).unwrap().name, "Dr. John Mwamba");
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn every_doctor_carries_the_slot_template() {
        let catalog = DoctorCatalog::seeded();
        for doctor in catalog.list(None) {
            assert_eq!(doctor.working_hours.len(), WORKING_HOURS.len());
            assert_eq!(doctor.working_hours[0], "08:00");
            assert!(doctor.available);
        }
    }
}
