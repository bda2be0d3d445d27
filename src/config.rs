use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use anyhow::{Context, Result};

/// Longest session lifetime accepted from configuration (one year).
pub const MAX_SESSION_DURATION_HOURS: i64 = 8760;

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The URL of the SQLite prediction log.
    pub database_url: String,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Path to the fitted model artifact.
    pub model_path: PathBuf,
    /// Path to the credential table.
    pub credentials_path: PathBuf,
    /// The duration of a session in hours.
    pub session_duration_hours: i64,
    /// Directory served for non-API requests.
    pub static_dir: PathBuf,
    /// Whether cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let session_duration_hours = parse_session_duration_hours(
            &env::var("SESSION_DURATION_HOURS").unwrap_or_else(|_| "12".to_string()),
        )?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://predictions.db".to_string()),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "models/heart_model.json".to_string())
                .into(),
            credentials_path: env::var("CREDENTIALS_PATH")
                .unwrap_or_else(|_| "config/credentials.json".to_string())
                .into(),
            session_duration_hours,
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "public".to_string())
                .into(),
            secure_cookies: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string()) == "production",
        })
    }
}

/// Parses `SESSION_DURATION_HOURS`, accepting `1..=MAX_SESSION_DURATION_HOURS`.
fn parse_session_duration_hours(raw: &str) -> Result<i64> {
    let hours: i64 = raw.trim().parse().context("Invalid SESSION_DURATION_HOURS")?;

    if !(1..=MAX_SESSION_DURATION_HOURS).contains(&hours) {
        anyhow::bail!(
            "SESSION_DURATION_HOURS must be between 1 and {}, got {}",
            MAX_SESSION_DURATION_HOURS,
            hours
        );
    }

    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_duration_accepts_the_configured_range() {
        assert_eq!(parse_session_duration_hours("12").unwrap(), 12);
        assert_eq!(parse_session_duration_hours("1").unwrap(), 1);
        assert_eq!(
            parse_session_duration_hours("8760").unwrap(),
            MAX_SESSION_DURATION_HOURS
        );
    }

    #[test]
    fn session_duration_rejects_out_of_range_values() {
        for raw in ["0", "-3", "8761", "10000000000", "twelve"] {
            assert!(parse_session_duration_hours(raw).is_err(), "{raw}");
        }
    }
}
