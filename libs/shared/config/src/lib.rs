use std::env;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_file: Option<PathBuf>,
    pub reminder_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_file: None,
            reminder_interval_secs: 300,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| {
            warn!("HOST not set, binding to 0.0.0.0");
            "0.0.0.0".to_string()
        });

        let port = env::var("PORT")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!("PORT value {:?} is not a valid port, using 3000", raw);
                    None
                }
            })
            .unwrap_or(3000);

        let data_file = env::var("DATA_FILE").ok().map(PathBuf::from);
        if data_file.is_none() {
            warn!("DATA_FILE not set, appointments are kept in memory only");
        }

        let reminder_interval_secs = env::var("REMINDER_INTERVAL_SECS")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    warn!(
                        "REMINDER_INTERVAL_SECS value {:?} is not a number, using 300",
                        raw
                    );
                    None
                }
            })
            .unwrap_or(300);

        Self {
            host,
            port,
            data_file,
            reminder_interval_secs,
        }
    }

    pub fn is_file_backed(&self) -> bool {
        self.data_file.is_some()
    }
}
