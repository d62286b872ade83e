//! Storage module for persisting fuel data
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Provider and price upserts from scrape runs
//! - Provider and price administration
//! - The append-only scrape log and run tracking
//! - The vehicle catalogue and trip estimate history

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::fuel::FuelType;
use crate::FuelError;
use std::fmt;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(FuelError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, FuelError> {
    SqliteStorage::new(path)
}

/// Represents a scrape run in the database
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// At least one provider was scraped
    Completed,
    /// Every provider failed
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Outcome of one provider's scrape attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStatus {
    Success,
    Failed,
}

impl ScrapeStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "SUCCESS" => Some(Self::Success),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_db_string())
    }
}

/// Represents a fuel provider in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// Represents a stored price, joined with its provider's name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRecord {
    pub id: i64,
    pub provider_id: i64,
    pub provider_name: String,
    pub fuel_name: String,
    pub fuel_type: FuelType,
    pub price: i64,
    pub updated_at: String,
}

/// Represents one scrape log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeLogRecord {
    pub id: i64,
    pub run_id: Option<i64>,
    pub provider: String,
    pub status: ScrapeStatus,
    pub message: Option<String>,
    pub created_at: String,
}

/// Represents a vehicle category (e.g. "Mobil", "Motor")
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleCategoryRecord {
    pub id: i64,
    pub name: String,
    /// Consumption used when no vehicle type is chosen
    pub default_kml: f64,
    pub created_at: String,
}

/// Represents a specific vehicle within a category
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleTypeRecord {
    pub id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub name: String,
    pub km_per_liter: f64,
    pub created_at: String,
}

/// A trip estimate to be recorded
#[derive(Debug, Clone, PartialEq)]
pub struct NewEstimate {
    pub start_name: Option<String>,
    pub end_name: Option<String>,
    pub vehicle_name: Option<String>,
    pub distance_km: f64,
    /// Liters, already rounded to two decimals
    pub liters_used: f64,
    pub total_cost: i64,
}

/// Represents a recorded trip estimate
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateRecord {
    pub id: i64,
    pub start_name: Option<String>,
    pub end_name: Option<String>,
    pub vehicle_name: Option<String>,
    pub distance_km: f64,
    pub liters_used: f64,
    pub total_cost: i64,
    pub created_at: String,
}

/// Row counts shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageCounts {
    pub vehicle_categories: u64,
    pub vehicle_types: u64,
    pub providers: u64,
    pub prices: u64,
    pub estimates: u64,
}
