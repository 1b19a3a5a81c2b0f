// libs/doctor-cell/src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed daily slot template shared by every doctor. 13:00 is the lunch
/// hour and is never bookable.
pub const WORKING_HOURS: [&str; 8] = [
    "08:00", "09:00", "10:00", "11:00", "12:00", "14:00", "15:00", "16:00",
];

/// Closed set of hospital departments. Unknown department values coming in
/// over the wire are rejected at validation time, never silently accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    General,
    Pediatrics,
    Surgery,
    Dental,
    Eye,
    Maternity,
}

impl Department {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "general" => Some(Department::General),
            "pediatrics" => Some(Department::Pediatrics),
            "surgery" => Some(Department::Surgery),
            "dental" => Some(Department::Dental),
            "eye" => Some(Department::Eye),
            "maternity" => Some(Department::Maternity),
            _ => None,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Department::General => write!(f, "general"),
            Department::Pediatrics => write!(f, "pediatrics"),
            Department::Surgery => write!(f, "surgery"),
            Department::Dental => write!(f, "dental"),
            Department::Eye => write!(f, "eye"),
            Department::Maternity => write!(f, "maternity"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub department: Department,
    pub working_hours: Vec<String>,
    pub available: bool,
}
