//! TUI configuration from environment

/// Runtime configuration for the admin panel.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the inventory API
    pub api_url: String,
    /// Tracing filter directive (e.g. "info", "inventario_client=debug")
    pub log_filter: String,
    /// Log file path
    pub log_file: String,
}

impl AppConfig {
    /// Load configuration from the environment (`.env` supported).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            api_url: std::env::var("INVENTARIO_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            log_filter: std::env::var("INVENTARIO_LOG").unwrap_or_else(|_| "info".to_string()),
            log_file: std::env::var("INVENTARIO_LOG_FILE")
                .unwrap_or_else(|_| "inventario-tui.log".to_string()),
        }
    }
}
