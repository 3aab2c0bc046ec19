use std::net::SocketAddr;

use serde::Deserialize;

/// Production kwtSMS send endpoint.
pub const DEFAULT_KWTSMS_API_URL: &str = "https://www.kwtsms.com/API/send/";

/// Global application configuration loaded from environment variables.
///
/// SMS credentials and templates are not part of this struct; they live in the
/// options table and are loaded per request.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,

    /// Address the API server binds to (default: 0.0.0.0:3000)
    pub listen_addr: SocketAddr,

    /// kwtSMS send endpoint, overridable for staging
    pub kwtsms_api_url: String,

    /// Optional per-request timeout for the SMS call; unset keeps the client default
    pub sms_request_timeout_secs: Option<u64>,

    /// JWT secret for admin authentication
    pub jwt_secret: String,

    /// JWT token expiry in hours
    pub jwt_expiry_hours: u64,

    /// Admin login for the settings API
    pub admin_username: String,
    pub admin_password: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("LISTEN_ADDR must be a valid socket address"))?,
            kwtsms_api_url: std::env::var("KWTSMS_API_URL")
                .unwrap_or_else(|_| DEFAULT_KWTSMS_API_URL.to_string()),
            sms_request_timeout_secs: std::env::var("SMS_REQUEST_TIMEOUT_SECS")
                .ok()
                .map(|v| v.parse())
                .transpose()
                .map_err(|_| anyhow::anyhow!("SMS_REQUEST_TIMEOUT_SECS must be a valid u64"))?,
            jwt_secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?,
            jwt_expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("JWT_EXPIRY_HOURS must be a valid u64"))?,
            admin_username: std::env::var("ADMIN_USERNAME")
                .map_err(|_| anyhow::anyhow!("ADMIN_USERNAME environment variable is required"))?,
            admin_password: std::env::var("ADMIN_PASSWORD")
                .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD environment variable is required"))?,
        })
    }
}
