//! Fuel domain types and normalization
//!
//! This module holds the pieces every scraper shares:
//! - `FuelType`: the normalized octane/diesel grade
//! - `FuelPriceRecord`: one scraped price, ready for persistence
//! - `classify`: maps a product name to its grade
//! - `parse_price`: turns a locale-formatted price cell into an integer

mod classify;
mod price;
mod types;

pub use classify::{classify, CLASSIFICATION_RULES};
pub use price::parse_price;
pub use types::{FuelPriceRecord, FuelType, ParseFuelTypeError};
