//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::fuel::FuelType;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{
    EstimateRecord, NewEstimate, PriceRecord, ProviderRecord, RunRecord, RunStatus,
    ScrapeLogRecord, ScrapeStatus, StorageCounts, VehicleCategoryRecord, VehicleTypeRecord,
};
use crate::FuelError;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, status";

const PRICE_SELECT: &str = "SELECT p.id, p.provider_id, f.name, p.fuel_name, p.fuel_type, p.price, p.updated_at
     FROM fuel_prices p JOIN fuel_providers f ON f.id = p.provider_id";

const LOG_COLUMNS: &str = "id, run_id, provider, status, message, created_at";

const CATEGORY_COLUMNS: &str = "id, name, default_kml, created_at";

const VEHICLE_TYPE_SELECT: &str = "SELECT t.id, t.category_id, c.name, t.name, t.km_per_liter, t.created_at
     FROM vehicle_types t JOIN vehicle_categories c ON c.id = t.category_id";

const ESTIMATE_COLUMNS: &str =
    "id, start_name, end_name, vehicle_name, distance_km, liters_used, total_cost, created_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(FuelError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, FuelError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, FuelError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Turns SQLite constraint failures into `ConstraintViolation`
fn constraint_error(e: rusqlite::Error, context: impl FnOnce() -> String) -> StorageError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
            StorageError::ConstraintViolation(context())
        }
        _ => StorageError::Sqlite(e),
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
    })
}

fn price_from_row(row: &Row<'_>) -> rusqlite::Result<PriceRecord> {
    let fuel_type: String = row.get(4)?;
    let fuel_type = fuel_type
        .parse::<FuelType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(PriceRecord {
        id: row.get(0)?,
        provider_id: row.get(1)?,
        provider_name: row.get(2)?,
        fuel_name: row.get(3)?,
        fuel_type,
        price: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn log_from_row(row: &Row<'_>) -> rusqlite::Result<ScrapeLogRecord> {
    Ok(ScrapeLogRecord {
        id: row.get(0)?,
        run_id: row.get(1)?,
        provider: row.get(2)?,
        status: ScrapeStatus::from_db_string(&row.get::<_, String>(3)?)
            .unwrap_or(ScrapeStatus::Failed),
        message: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<VehicleCategoryRecord> {
    Ok(VehicleCategoryRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        default_kml: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn vehicle_type_from_row(row: &Row<'_>) -> rusqlite::Result<VehicleTypeRecord> {
    Ok(VehicleTypeRecord {
        id: row.get(0)?,
        category_id: row.get(1)?,
        category_name: row.get(2)?,
        name: row.get(3)?,
        km_per_liter: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn estimate_from_row(row: &Row<'_>) -> rusqlite::Result<EstimateRecord> {
    Ok(EstimateRecord {
        id: row.get(0)?,
        start_name: row.get(1)?,
        end_name: row.get(2)?,
        vehicle_name: row.get(3)?,
        distance_km: row.get(4)?,
        liters_used: row.get(5)?,
        total_cost: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl SqliteStorage {
    fn count_rows(&self, table: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO scrape_runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM scrape_runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM scrape_runs ORDER BY id DESC LIMIT 1",
                    RUN_COLUMNS
                ),
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE scrape_runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Providers =====

    fn upsert_provider(&mut self, name: &str) -> StorageResult<i64> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM fuel_providers WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO fuel_providers (name, created_at) VALUES (?1, ?2)",
            params![name, now],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn create_provider(&mut self, name: &str) -> StorageResult<ProviderRecord> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO fuel_providers (name, created_at) VALUES (?1, ?2)",
                params![name, now],
            )
            .map_err(|e| constraint_error(e, || format!("provider '{}' already exists", name)))?;

        Ok(ProviderRecord {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            created_at: now,
        })
    }

    fn rename_provider(&mut self, provider_id: i64, name: &str) -> StorageResult<()> {
        let updated = self
            .conn
            .execute(
                "UPDATE fuel_providers SET name = ?1 WHERE id = ?2",
                params![name, provider_id],
            )
            .map_err(|e| constraint_error(e, || format!("provider '{}' already exists", name)))?;

        if updated == 0 {
            return Err(StorageError::ProviderNotFound(provider_id));
        }
        Ok(())
    }

    fn delete_provider(&mut self, provider_id: i64) -> StorageResult<()> {
        let deleted = self.conn.execute(
            "DELETE FROM fuel_providers WHERE id = ?1",
            params![provider_id],
        )?;
        if deleted == 0 {
            return Err(StorageError::ProviderNotFound(provider_id));
        }
        Ok(())
    }

    fn list_providers(&self) -> StorageResult<Vec<ProviderRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM fuel_providers ORDER BY name ASC")?;

        let providers = stmt
            .query_map([], |row| {
                Ok(ProviderRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(providers)
    }

    // ===== Prices =====

    fn upsert_price(
        &mut self,
        provider_id: i64,
        fuel_name: &str,
        fuel_type: FuelType,
        price: i64,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .query_row(
                "INSERT INTO fuel_prices (provider_id, fuel_name, fuel_type, price, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(provider_id, fuel_name, fuel_type)
                 DO UPDATE SET price = excluded.price, updated_at = excluded.updated_at
                 RETURNING id",
                params![provider_id, fuel_name, fuel_type.to_db_string(), price, now],
                |row| row.get(0),
            )
            .map_err(|e| constraint_error(e, || format!("provider {} does not exist", provider_id)))
    }

    fn create_price(
        &mut self,
        provider_id: i64,
        fuel_name: &str,
        fuel_type: FuelType,
        price: i64,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO fuel_prices (provider_id, fuel_name, fuel_type, price, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![provider_id, fuel_name, fuel_type.to_db_string(), price, now],
            )
            .map_err(|e| {
                constraint_error(e, || {
                    format!(
                        "cannot add {} ({}) to provider {}: duplicate or unknown provider",
                        fuel_name, fuel_type, provider_id
                    )
                })
            })?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_price(
        &mut self,
        price_id: i64,
        fuel_name: &str,
        fuel_type: FuelType,
        price: i64,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self
            .conn
            .execute(
                "UPDATE fuel_prices SET fuel_name = ?1, fuel_type = ?2, price = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![fuel_name, fuel_type.to_db_string(), price, now, price_id],
            )
            .map_err(|e| {
                constraint_error(e, || {
                    format!("provider already lists {} ({})", fuel_name, fuel_type)
                })
            })?;

        if updated == 0 {
            return Err(StorageError::PriceNotFound(price_id));
        }
        Ok(())
    }

    fn delete_price(&mut self, price_id: i64) -> StorageResult<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM fuel_prices WHERE id = ?1", params![price_id])?;
        if deleted == 0 {
            return Err(StorageError::PriceNotFound(price_id));
        }
        Ok(())
    }

    fn get_price(&self, price_id: i64) -> StorageResult<Option<PriceRecord>> {
        let price = self
            .conn
            .query_row(
                &format!("{} WHERE p.id = ?1", PRICE_SELECT),
                params![price_id],
                price_from_row,
            )
            .optional()?;
        Ok(price)
    }

    fn list_prices(&self, provider_id: i64) -> StorageResult<Vec<PriceRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE p.provider_id = ?1 ORDER BY p.fuel_name ASC, p.fuel_type ASC",
            PRICE_SELECT
        ))?;

        let prices = stmt
            .query_map(params![provider_id], price_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(prices)
    }

    fn count_prices(&self) -> StorageResult<u64> {
        self.count_rows("fuel_prices")
    }

    // ===== Scrape Log =====

    fn append_scrape_log(
        &mut self,
        run_id: Option<i64>,
        provider: &str,
        status: ScrapeStatus,
        message: Option<&str>,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO scrape_logs (run_id, provider, status, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![run_id, provider, status.to_db_string(), message, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn recent_scrape_logs(&self, limit: usize) -> StorageResult<Vec<ScrapeLogRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM scrape_logs ORDER BY id DESC LIMIT ?1",
            LOG_COLUMNS
        ))?;

        let logs = stmt
            .query_map(params![limit as i64], log_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    fn scrape_logs_for_run(&self, run_id: i64) -> StorageResult<Vec<ScrapeLogRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM scrape_logs WHERE run_id = ?1 ORDER BY id ASC",
            LOG_COLUMNS
        ))?;

        let logs = stmt
            .query_map(params![run_id], log_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    // ===== Vehicles =====

    fn create_vehicle_category(
        &mut self,
        name: &str,
        default_kml: f64,
    ) -> StorageResult<VehicleCategoryRecord> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO vehicle_categories (name, default_kml, created_at) VALUES (?1, ?2, ?3)",
                params![name, default_kml, now],
            )
            .map_err(|e| {
                constraint_error(e, || {
                    format!("category '{}' already exists or {} km/l is not positive", name, default_kml)
                })
            })?;

        Ok(VehicleCategoryRecord {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            default_kml,
            created_at: now,
        })
    }

    fn update_vehicle_category(
        &mut self,
        category_id: i64,
        name: &str,
        default_kml: f64,
    ) -> StorageResult<()> {
        let updated = self
            .conn
            .execute(
                "UPDATE vehicle_categories SET name = ?1, default_kml = ?2 WHERE id = ?3",
                params![name, default_kml, category_id],
            )
            .map_err(|e| {
                constraint_error(e, || {
                    format!("category '{}' already exists or {} km/l is not positive", name, default_kml)
                })
            })?;

        if updated == 0 {
            return Err(StorageError::VehicleCategoryNotFound(category_id));
        }
        Ok(())
    }

    fn delete_vehicle_category(&mut self, category_id: i64) -> StorageResult<()> {
        let deleted = self.conn.execute(
            "DELETE FROM vehicle_categories WHERE id = ?1",
            params![category_id],
        )?;
        if deleted == 0 {
            return Err(StorageError::VehicleCategoryNotFound(category_id));
        }
        Ok(())
    }

    fn get_vehicle_category(
        &self,
        category_id: i64,
    ) -> StorageResult<Option<VehicleCategoryRecord>> {
        let category = self
            .conn
            .query_row(
                &format!("SELECT {} FROM vehicle_categories WHERE id = ?1", CATEGORY_COLUMNS),
                params![category_id],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    fn list_vehicle_categories(&self) -> StorageResult<Vec<VehicleCategoryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM vehicle_categories ORDER BY name ASC",
            CATEGORY_COLUMNS
        ))?;

        let categories = stmt
            .query_map([], category_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    fn create_vehicle_type(
        &mut self,
        category_id: i64,
        name: &str,
        km_per_liter: f64,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO vehicle_types (category_id, name, km_per_liter, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![category_id, name, km_per_liter, now],
            )
            .map_err(|e| {
                constraint_error(e, || {
                    format!(
                        "cannot add '{}' to category {}: duplicate, unknown category or non-positive km/l",
                        name, category_id
                    )
                })
            })?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_vehicle_type(
        &mut self,
        vehicle_type_id: i64,
        name: &str,
        km_per_liter: f64,
    ) -> StorageResult<()> {
        let updated = self
            .conn
            .execute(
                "UPDATE vehicle_types SET name = ?1, km_per_liter = ?2 WHERE id = ?3",
                params![name, km_per_liter, vehicle_type_id],
            )
            .map_err(|e| {
                constraint_error(e, || {
                    format!("category already has '{}' or {} km/l is not positive", name, km_per_liter)
                })
            })?;

        if updated == 0 {
            return Err(StorageError::VehicleTypeNotFound(vehicle_type_id));
        }
        Ok(())
    }

    fn delete_vehicle_type(&mut self, vehicle_type_id: i64) -> StorageResult<()> {
        let deleted = self.conn.execute(
            "DELETE FROM vehicle_types WHERE id = ?1",
            params![vehicle_type_id],
        )?;
        if deleted == 0 {
            return Err(StorageError::VehicleTypeNotFound(vehicle_type_id));
        }
        Ok(())
    }

    fn get_vehicle_type(&self, vehicle_type_id: i64) -> StorageResult<Option<VehicleTypeRecord>> {
        let vehicle_type = self
            .conn
            .query_row(
                &format!("{} WHERE t.id = ?1", VEHICLE_TYPE_SELECT),
                params![vehicle_type_id],
                vehicle_type_from_row,
            )
            .optional()?;
        Ok(vehicle_type)
    }

    fn list_vehicle_types(&self, category_id: i64) -> StorageResult<Vec<VehicleTypeRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE t.category_id = ?1 ORDER BY t.name ASC",
            VEHICLE_TYPE_SELECT
        ))?;

        let types = stmt
            .query_map(params![category_id], vehicle_type_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(types)
    }

    // ===== Estimate History =====

    fn record_estimate(&mut self, estimate: &NewEstimate) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO estimate_history
                 (start_name, end_name, vehicle_name, distance_km, liters_used, total_cost, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                estimate.start_name,
                estimate.end_name,
                estimate.vehicle_name,
                estimate.distance_km,
                estimate.liters_used,
                estimate.total_cost,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn recent_estimates(&self, limit: usize) -> StorageResult<Vec<EstimateRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM estimate_history ORDER BY id DESC LIMIT ?1",
            ESTIMATE_COLUMNS
        ))?;

        let estimates = stmt
            .query_map(params![limit as i64], estimate_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(estimates)
    }

    // ===== Statistics =====

    fn counts(&self) -> StorageResult<StorageCounts> {
        Ok(StorageCounts {
            vehicle_categories: self.count_rows("vehicle_categories")?,
            vehicle_types: self.count_rows("vehicle_types")?,
            providers: self.count_rows("fuel_providers")?,
            prices: self.count_rows("fuel_prices")?,
            estimates: self.count_rows("estimate_history")?,
        })
    }
}
