pub mod auth; // sign-in, registration, OTP flows (local mock)
pub mod bookings; // booking repository + lifecycle
pub mod calendar; // month grid + slot picker
pub mod catalog; // doctor & medical-center directory filtering
pub mod config;
pub mod favorites; // in-memory favorites registries
pub mod models;
pub mod state; // app-wide service objects
pub mod store; // persisted key-value store

use tracing_subscriber::EnvFilter;

/// Initialize tracing for an embedding shell (desktop or mobile).
///
/// Call once at process start, before constructing [`state::AppState`].
pub fn init_telemetry() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("ElderCare core starting v{}", config::APP_VERSION);
}
