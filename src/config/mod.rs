//! Configuration module for the Glico Controle backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

/// Email granted dashboard access without the payment step.
///
/// A neutral placeholder stands in for the personal mailbox the mobile app
/// hardcoded; deployments set the real address through `GLYCO_ADMIN_EMAIL`.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@glicocontrole.app";

/// Key under which the application document is stored.
pub const DEFAULT_SNAPSHOT_KEY: &str = "diabetesAppState";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Simulated latencies for operations that disable their control while pending.
#[derive(Debug, Clone)]
pub struct Delays {
    /// Payment confirmation
    pub payment: Duration,
    /// Glucose reading and reminder submission
    pub submit: Duration,
    /// Profile save
    pub profile: Duration,
}

impl Delays {
    /// No artificial latency at all.
    pub fn none() -> Self {
        Self {
            payment: Duration::ZERO,
            submit: Duration::ZERO,
            profile: Duration::ZERO,
        }
    }
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            payment: Duration::from_millis(3000),
            submit: Duration::from_millis(500),
            profile: Duration::from_millis(1000),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Administrative identity, matched exactly against the quiz email
    pub admin_email: String,
    /// Key of the persisted document snapshot
    pub snapshot_key: String,
    /// Offset used to derive calendar dates and the hour of day
    pub utc_offset: FixedOffset,
    /// Simulated latencies
    pub delays: Delays,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/app.sqlite"),
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8080))),
            log_level: "info".to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            utc_offset: utc(),
            delays: Delays::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Problems with individual variables fall back to the default and are
    /// returned as warnings, to be logged once tracing is installed.
    pub fn from_env() -> (Self, Vec<String>) {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let db_path = env::var("GLYCO_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let mut warnings = Vec::new();

        let bind_addr = match env::var("GLYCO_BIND_ADDR") {
            Ok(raw) => parse_bind_addr(&raw, defaults.bind_addr).unwrap_or_else(|(addr, warning)| {
                warnings.push(warning);
                addr
            }),
            Err(_) => defaults.bind_addr,
        };

        let log_level = env::var("GLYCO_LOG_LEVEL").unwrap_or(defaults.log_level);
        let admin_email = env::var("GLYCO_ADMIN_EMAIL").unwrap_or(defaults.admin_email);
        let snapshot_key = env::var("GLYCO_SNAPSHOT_KEY").unwrap_or(defaults.snapshot_key);

        let utc_offset = env_number::<i32>("GLYCO_UTC_OFFSET_MINUTES")
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .unwrap_or(defaults.utc_offset);

        let delays = Delays {
            payment: env_millis("GLYCO_PAYMENT_DELAY_MS").unwrap_or(defaults.delays.payment),
            submit: env_millis("GLYCO_SUBMIT_DELAY_MS").unwrap_or(defaults.delays.submit),
            profile: env_millis("GLYCO_PROFILE_DELAY_MS").unwrap_or(defaults.delays.profile),
        };

        let config = Self {
            db_path,
            bind_addr,
            log_level,
            admin_email,
            snapshot_key,
            utc_offset,
            delays,
        };

        (config, warnings)
    }
}

/// Parse a bind address, or hand back the fallback with a warning.
fn parse_bind_addr(raw: &str, fallback: SocketAddr) -> Result<SocketAddr, (SocketAddr, String)> {
    raw.trim().parse().map_err(|_| {
        (
            fallback,
            format!("Invalid GLYCO_BIND_ADDR {:?}, using {}", raw, fallback),
        )
    })
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|raw| raw.trim().parse().ok())
}

fn env_millis(name: &str) -> Option<Duration> {
    env_number::<u64>(name).map(Duration::from_millis)
}
