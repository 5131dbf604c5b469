//! Station configuration

/// Configuration for the scan station, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Print-server base URL
    pub server_url: String,
    /// Path of the persisted settings file
    pub settings_path: String,
    /// Request timeout for print-server calls
    pub request_timeout_secs: u64,
    /// Log level when RUST_LOG is not set
    pub log_level: String,
    /// JSON log output (for running the station as a service)
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_url: std::env::var("SERVER_URL")
                .unwrap_or_else(|_| "http://localhost:5001".into()),
            settings_path: std::env::var("SETTINGS_PATH")
                .unwrap_or_else(|_| "./labelscan-settings.json".into()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}
