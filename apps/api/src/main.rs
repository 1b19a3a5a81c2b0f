use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::handlers::AppState;
use appointment_cell::services::reminder::spawn_reminder_scan;
use appointment_cell::store::{AppointmentRepository, MemoryStore};
use doctor_cell::catalog::DoctorCatalog;
use shared_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hospital Appointment System API server");

    // Load configuration
    let config = AppConfig::from_env();

    // Doctor roster and appointment store
    let catalog = Arc::new(DoctorCatalog::seeded());
    let store: Arc<dyn AppointmentRepository> = match &config.data_file {
        Some(path) => Arc::new(MemoryStore::with_data_file(catalog.roster(), path.clone())?),
        None => Arc::new(MemoryStore::new(catalog.roster())),
    };

    // Background reminder scan, stopped through the shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reminder = spawn_reminder_scan(store.clone(), config.reminder_interval_secs, shutdown_rx);

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Create shared state
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = Arc::new(AppState {
        config,
        catalog,
        store,
        started_at: Instant::now(),
        version: env!("CARGO_PKG_VERSION"),
    });

    // Build the application router
    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    let _ = reminder.await;
    info!("Server stopped");

    Ok(())
}
