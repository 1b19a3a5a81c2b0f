// libs/appointment-cell/src/services/reminder.rs
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::models::AppointmentStatus;
use crate::store::AppointmentRepository;

/// Periodic reminder scan, owned by the process lifecycle: spawned on boot
/// and stopped through the shutdown channel. Read-only against the store;
/// delivery is simulated by logging. Failures are logged and swallowed.
pub fn spawn_reminder_scan(
    store: Arc<dyn AppointmentRepository>,
    interval_secs: u64,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(Duration::from_secs(interval_secs.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("reminder scan running every {}s", interval_secs.max(1));

        loop {
            tokio::select! {
                _ = ticker.tick() => scan_once(store.as_ref()).await,
                _ = shutdown.changed() => {
                    info!("reminder scan stopped");
                    break;
                }
            }
        }
    })
}

async fn scan_once(store: &dyn AppointmentRepository) {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let due = store.find_by_date(&today).await;

    let mut sent = 0;
    for appointment in due.iter().filter(|a| {
        matches!(
            a.status,
            AppointmentStatus::Pending | AppointmentStatus::Confirmed
        )
    }) {
        // A real SMS/email gateway would hook in here.
        info!(
            "reminder (simulated) to {} for appointment {} at {} with {}",
            appointment.patient_phone, appointment.id, appointment.time, appointment.doctor_name
        );
        sent += 1;
    }

    debug!("reminder scan for {} complete, {} reminder(s)", today, sent);
}
