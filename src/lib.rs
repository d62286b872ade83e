//! Fuel-Scout: a fuel price scraper and estimator
//!
//! This crate scrapes retail fuel prices from provider websites through a
//! headless browser, normalizes them into octane/diesel grades, and keeps
//! them in a SQLite database alongside a per-provider scrape log.

pub mod browser;
pub mod config;
pub mod estimate;
pub mod fuel;
pub mod output;
pub mod scraper;
pub mod storage;

use thiserror::Error;

/// Main error type for Fuel-Scout operations
#[derive(Debug, Error)]
pub enum FuelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Remote browser discovery failed for {url}: {message}")]
    RemoteBrowser { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("Estimate error: {0}")]
    Estimate(#[from] estimate::EstimateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Fuel-Scout operations
pub type Result<T> = std::result::Result<T, FuelError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use fuel::{classify, parse_price, FuelPriceRecord, FuelType};
pub use crate::scraper::{run_scrape, Orchestrator, ScrapeReport};
