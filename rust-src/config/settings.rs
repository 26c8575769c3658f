//! Application settings and path constants.

use std::path::PathBuf;

use anyhow::{bail, Result};


/// Page size used when the client sends none or an unusable one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page a client may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Largest visit count accepted for one day.
///
/// Even a row for every day of years 0000-9999 stays well inside `i64`
/// when summed.
pub const MAX_VISITS: i64 = 1_000_000_000_000;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default lifetime of minted tokens (seconds).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Log filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// CORS preflight cache lifetime (seconds).
pub const CORS_MAX_AGE_SECS: u64 = 60 * 60;


/// Get the default database path.
pub fn get_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("traffic-dash")
        .join("traffic.db")
}


/// Runtime settings for `trafficd serve`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub token_secret: String,
}


impl ServerConfig {
    pub fn new(port: u16, db_path: Option<PathBuf>, token_secret: Option<String>) -> Result<Self> {
        let token_secret = require_secret(token_secret)?;

        Ok(Self {
            port,
            db_path: db_path.unwrap_or_else(get_db_path),
            token_secret,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}


/// Token secret is mandatory wherever tokens are issued or verified.
pub fn require_secret(secret: Option<String>) -> Result<String> {
    match secret {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => bail!("Token secret not set. Pass --secret or set TRAFFIC_TOKEN_SECRET."),
    }
}
