use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "ElderCare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/ElderCare/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("ElderCare")
}

/// Get the persisted store directory (one file per store key)
pub fn store_dir() -> PathBuf {
    app_data_dir().join("store")
}
