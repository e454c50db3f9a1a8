//! Application configuration loaded from environment variables.

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3003`)
/// - `ACCOUNTS_API_URL` — accounts service base URL
///   (default: `"http://accounts-api:3002"`)
/// - `CHARGE_ON_ASSIGN` — debit the account on assignment when set to
///   `"true"` or `"1"` (default: disabled)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub accounts_base_url: String,
    pub charge_on_assign: bool,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3003),
            accounts_base_url: std::env::var("ACCOUNTS_API_URL")
                .unwrap_or_else(|_| "http://accounts-api:3002".to_string()),
            charge_on_assign: std::env::var("CHARGE_ON_ASSIGN")
                .map(|v| flag_enabled(&v))
                .unwrap_or(false),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn flag_enabled(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3003,
            accounts_base_url: "http://accounts-api:3002".to_string(),
            charge_on_assign: false,
            log_level: "info".to_string(),
        }
    }
}
