//! Storage traits and error types
//!
//! This module defines the persistence port used by the scrape orchestrator
//! and the administration commands, together with its error type.

use crate::fuel::{FuelPriceRecord, FuelType};
use crate::storage::{
    EstimateRecord, NewEstimate, PriceRecord, ProviderRecord, RunRecord, RunStatus,
    ScrapeLogRecord, ScrapeStatus, StorageCounts, VehicleCategoryRecord, VehicleTypeRecord,
};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Provider not found: {0}")]
    ProviderNotFound(i64),

    #[error("Price not found: {0}")]
    PriceNotFound(i64),

    #[error("Vehicle category not found: {0}")]
    VehicleCategoryNotFound(i64),

    #[error("Vehicle type not found: {0}")]
    VehicleTypeNotFound(i64),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The orchestrator receives a `&mut dyn Storage`, so tests can run the whole
/// pipeline against an in-memory database.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new scrape run in the `running` state
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Stamps a run with its final status and finish time
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Providers =====

    /// Returns the ID of the provider named `name`, creating it if absent
    fn upsert_provider(&mut self, name: &str) -> StorageResult<i64>;

    /// Creates a provider, failing if the name is taken
    fn create_provider(&mut self, name: &str) -> StorageResult<ProviderRecord>;

    /// Renames a provider
    fn rename_provider(&mut self, provider_id: i64, name: &str) -> StorageResult<()>;

    /// Deletes a provider together with its prices
    fn delete_provider(&mut self, provider_id: i64) -> StorageResult<()>;

    /// Lists all providers ordered by name
    fn list_providers(&self) -> StorageResult<Vec<ProviderRecord>>;

    // ===== Prices =====

    /// Inserts or updates the price keyed by (provider, fuel name, fuel type)
    ///
    /// # Returns
    ///
    /// The ID of the price row
    fn upsert_price(
        &mut self,
        provider_id: i64,
        fuel_name: &str,
        fuel_type: FuelType,
        price: i64,
    ) -> StorageResult<i64>;

    /// Upserts a batch of scraped prices in input order
    ///
    /// Each record first ensures its provider exists, then upserts its price.
    /// Repeated keys are not merged beforehand, so the last one wins.
    ///
    /// # Returns
    ///
    /// The number of records written
    fn upsert_prices(&mut self, records: &[FuelPriceRecord]) -> StorageResult<usize> {
        for record in records {
            let provider_id = self.upsert_provider(&record.provider)?;
            self.upsert_price(
                provider_id,
                &record.fuel_name,
                record.fuel_type,
                record.price,
            )?;
            tracing::debug!(
                "Updated {} - {}: Rp {}",
                record.provider,
                record.fuel_name,
                record.price
            );
        }
        Ok(records.len())
    }

    /// Creates a price row, failing if the key already exists
    fn create_price(
        &mut self,
        provider_id: i64,
        fuel_name: &str,
        fuel_type: FuelType,
        price: i64,
    ) -> StorageResult<i64>;

    /// Overwrites name, type and value of an existing price
    fn update_price(
        &mut self,
        price_id: i64,
        fuel_name: &str,
        fuel_type: FuelType,
        price: i64,
    ) -> StorageResult<()>;

    /// Deletes a price
    fn delete_price(&mut self, price_id: i64) -> StorageResult<()>;

    /// Gets a price with its provider name
    fn get_price(&self, price_id: i64) -> StorageResult<Option<PriceRecord>>;

    /// Lists a provider's prices ordered by fuel name
    fn list_prices(&self, provider_id: i64) -> StorageResult<Vec<PriceRecord>>;

    /// Counts all price rows
    fn count_prices(&self) -> StorageResult<u64>;

    // ===== Scrape Log =====

    /// Appends a scrape log entry
    fn append_scrape_log(
        &mut self,
        run_id: Option<i64>,
        provider: &str,
        status: ScrapeStatus,
        message: Option<&str>,
    ) -> StorageResult<i64>;

    /// Gets the most recent log entries, newest first
    fn recent_scrape_logs(&self, limit: usize) -> StorageResult<Vec<ScrapeLogRecord>>;

    /// Gets the log entries written by one run, in write order
    fn scrape_logs_for_run(&self, run_id: i64) -> StorageResult<Vec<ScrapeLogRecord>>;

    // ===== Vehicles =====

    /// Creates a vehicle category, failing if the name is taken
    fn create_vehicle_category(
        &mut self,
        name: &str,
        default_kml: f64,
    ) -> StorageResult<VehicleCategoryRecord>;

    /// Overwrites a category's name and default consumption
    fn update_vehicle_category(
        &mut self,
        category_id: i64,
        name: &str,
        default_kml: f64,
    ) -> StorageResult<()>;

    /// Deletes a category together with its vehicle types
    fn delete_vehicle_category(&mut self, category_id: i64) -> StorageResult<()>;

    fn get_vehicle_category(&self, category_id: i64)
        -> StorageResult<Option<VehicleCategoryRecord>>;

    /// Lists all categories ordered by name
    fn list_vehicle_categories(&self) -> StorageResult<Vec<VehicleCategoryRecord>>;

    /// Creates a vehicle type in a category
    ///
    /// # Returns
    ///
    /// The ID of the new vehicle type
    fn create_vehicle_type(
        &mut self,
        category_id: i64,
        name: &str,
        km_per_liter: f64,
    ) -> StorageResult<i64>;

    /// Overwrites a vehicle type's name and consumption
    fn update_vehicle_type(
        &mut self,
        vehicle_type_id: i64,
        name: &str,
        km_per_liter: f64,
    ) -> StorageResult<()>;

    fn delete_vehicle_type(&mut self, vehicle_type_id: i64) -> StorageResult<()>;

    /// Gets a vehicle type with its category name
    fn get_vehicle_type(&self, vehicle_type_id: i64) -> StorageResult<Option<VehicleTypeRecord>>;

    /// Lists a category's vehicle types ordered by name
    fn list_vehicle_types(&self, category_id: i64) -> StorageResult<Vec<VehicleTypeRecord>>;

    // ===== Estimate History =====

    /// Records a trip estimate
    ///
    /// # Returns
    ///
    /// The ID of the history entry
    fn record_estimate(&mut self, estimate: &NewEstimate) -> StorageResult<i64>;

    /// Gets the most recent estimates, newest first
    fn recent_estimates(&self, limit: usize) -> StorageResult<Vec<EstimateRecord>>;

    // ===== Statistics =====

    /// Counts vehicles, providers, prices and estimates
    fn counts(&self) -> StorageResult<StorageCounts>;
}
