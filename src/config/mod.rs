//! Configuration module for Fuel-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use fuel_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("fuel-scout.toml")).unwrap();
//! println!("Scraping prices for region: {}", config.scraper.region);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, OutputConfig, ScraperConfig, SourcesConfig, DEFAULT_REGION,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
