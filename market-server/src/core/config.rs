//! Server configuration
//!
//! # Environment variables
//!
//! All settings can be overridden through the environment:
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/market | Work directory (database, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | GATEWAY_DELAY_MS | 2000 | Simulated card-capture latency |
//! | POINTS_PER_CURRENCY | 0.1 | Loyalty points per currency unit |
//!
//! # Example
//!
//! ```ignore
//! WORK_DIR=/data/market HTTP_PORT=8080 cargo run
//! ```

use std::path::PathBuf;

use crate::points::DEFAULT_POINTS_PER_CURRENCY;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Simulated payment gateway latency for card checkouts (ms)
    pub gateway_delay_ms: u64,
    /// Loyalty points earned per currency unit of order total
    pub points_per_currency: f64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/market".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            gateway_delay_ms: std::env::var("GATEWAY_DELAY_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(2000),
            points_per_currency: std::env::var("POINTS_PER_CURRENCY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_POINTS_PER_CURRENCY),
        }
    }

    /// Path of the embedded database file
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("market.redb")
    }

    /// Path of the log directory
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
