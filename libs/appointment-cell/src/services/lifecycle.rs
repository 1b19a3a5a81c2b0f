// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{AppointmentStatus, BookingError};

/// Allowed next statuses for a given current status.
///
/// pending -> confirmed | cancelled
/// confirmed -> completed | cancelled
/// completed, cancelled -> (terminal)
pub fn valid_transitions(current: AppointmentStatus) -> &'static [AppointmentStatus] {
    match current {
        AppointmentStatus::Pending => &[AppointmentStatus::Confirmed, AppointmentStatus::Cancelled],
        AppointmentStatus::Confirmed => {
            &[AppointmentStatus::Completed, AppointmentStatus::Cancelled]
        }
        AppointmentStatus::Completed | AppointmentStatus::Cancelled => &[],
    }
}

/// Rejects any transition outside the lifecycle graph. The graph is
/// enforced deliberately: permissive status updates would let a completed
/// or cancelled appointment come back to life.
pub fn validate_transition(
    current: AppointmentStatus,
    target: AppointmentStatus,
) -> Result<(), BookingError> {
    if !valid_transitions(current).contains(&target) {
        warn!("rejected status transition {} -> {}", current, target);
        return Err(BookingError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    debug!("status transition {} -> {} accepted", current, target);
    Ok(())
}
