//! Configuration module for practice-hub.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote notification/account service. `None` runs the stores local-only.
    pub api_base_url: Option<String>,
    /// Service key sent by clients and required by the notification service
    pub api_key: Option<String>,
    /// Directory backing the file key-value store
    pub data_dir: PathBuf,
    /// Path to the notification service SQLite database
    pub db_path: PathBuf,
    /// Address the notification service binds to
    pub bind_addr: SocketAddr,
    /// Period between notification polls
    pub poll_interval: Duration,
    /// Timeout applied to every remote call
    pub request_timeout: Duration,
    /// Delay before a terminal save status is cleared
    pub status_clear_delay: Duration,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            api_key: None,
            data_dir: PathBuf::from("./data/local"),
            db_path: PathBuf::from("./data/notifications.sqlite"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            poll_interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
            status_clear_delay: Duration::from_secs(3),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let api_base_url = env::var("PRACTICE_API_BASE_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let api_key = env::var("PRACTICE_API_KEY").ok().filter(|k| !k.is_empty());

        let data_dir = env::var("PRACTICE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let db_path = env::var("PRACTICE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let bind_addr = match env::var("PRACTICE_BIND_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(
                    "Ignoring invalid PRACTICE_BIND_ADDR={:?} ({}), using {}",
                    raw,
                    e,
                    defaults.bind_addr
                );
                defaults.bind_addr
            }),
            Err(_) => defaults.bind_addr,
        };

        let log_level = env::var("PRACTICE_LOG_LEVEL").unwrap_or(defaults.log_level);

        Self {
            api_base_url,
            api_key,
            data_dir,
            db_path,
            bind_addr,
            poll_interval: secs_var("PRACTICE_POLL_INTERVAL_SECS", defaults.poll_interval),
            request_timeout: secs_var("PRACTICE_REQUEST_TIMEOUT_SECS", defaults.request_timeout),
            status_clear_delay: secs_var("PRACTICE_STATUS_CLEAR_SECS", defaults.status_clear_delay),
            log_level,
        }
    }
}

fn secs_var(name: &str, default: Duration) -> Duration {
    match env::var(name) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}, using {:?}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
