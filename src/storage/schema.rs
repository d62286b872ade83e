//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Fuel-Scout database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track scrape runs
CREATE TABLE IF NOT EXISTS scrape_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Fuel retailers
CREATE TABLE IF NOT EXISTS fuel_providers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

-- Current price per provider product
CREATE TABLE IF NOT EXISTS fuel_prices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    provider_id INTEGER NOT NULL REFERENCES fuel_providers(id) ON DELETE CASCADE,
    fuel_name TEXT NOT NULL,
    fuel_type TEXT NOT NULL,
    price INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(provider_id, fuel_name, fuel_type)
);

CREATE INDEX IF NOT EXISTS idx_fuel_prices_provider ON fuel_prices(provider_id);

-- Append-only audit of provider scrape attempts
CREATE TABLE IF NOT EXISTS scrape_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER REFERENCES scrape_runs(id),
    provider TEXT NOT NULL,
    status TEXT NOT NULL,
    message TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scrape_logs_run ON scrape_logs(run_id);
CREATE INDEX IF NOT EXISTS idx_scrape_logs_created ON scrape_logs(created_at);

-- Vehicle catalogue: categories carry a default consumption
CREATE TABLE IF NOT EXISTS vehicle_categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    default_kml REAL NOT NULL CHECK (default_kml > 0),
    created_at TEXT NOT NULL
);

-- Specific vehicles overriding their category's consumption
CREATE TABLE IF NOT EXISTS vehicle_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id INTEGER NOT NULL REFERENCES vehicle_categories(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    km_per_liter REAL NOT NULL CHECK (km_per_liter > 0),
    created_at TEXT NOT NULL,
    UNIQUE(category_id, name)
);

CREATE INDEX IF NOT EXISTS idx_vehicle_types_category ON vehicle_types(category_id);

-- Every trip estimate made
CREATE TABLE IF NOT EXISTS estimate_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    start_name TEXT,
    end_name TEXT,
    vehicle_name TEXT,
    distance_km REAL NOT NULL,
    liters_used REAL NOT NULL,
    total_cost INTEGER NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in [
            "scrape_runs",
            "fuel_providers",
            "fuel_prices",
            "scrape_logs",
            "vehicle_categories",
            "vehicle_types",
            "estimate_history",
        ] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }
}
