//! Catalogue statistics, estimate history and the vehicle listing

use crate::output::format_rupiah;
use crate::storage::{
    EstimateRecord, Storage, StorageCounts, VehicleCategoryRecord, VehicleTypeRecord,
};
use crate::FuelError;
use std::fmt::Write;

/// Number of estimates shown on the dashboard
pub const DASHBOARD_RECENT_ESTIMATES: usize = 5;

/// Row counts plus the latest estimates
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub counts: StorageCounts,
    pub recent_estimates: Vec<EstimateRecord>,
}

/// One category and its vehicle types
#[derive(Debug, Clone)]
pub struct CategoryVehicles {
    pub category: VehicleCategoryRecord,
    pub vehicle_types: Vec<VehicleTypeRecord>,
}

/// Loads the counts and the most recent estimates
pub fn load_dashboard(storage: &dyn Storage) -> Result<Dashboard, FuelError> {
    Ok(Dashboard {
        counts: storage.counts()?,
        recent_estimates: storage.recent_estimates(DASHBOARD_RECENT_ESTIMATES)?,
    })
}

/// Loads every category with its vehicle types, ordered by name
pub fn load_vehicle_catalogue(storage: &dyn Storage) -> Result<Vec<CategoryVehicles>, FuelError> {
    let mut catalogue = Vec::new();

    for category in storage.list_vehicle_categories()? {
        let vehicle_types = storage.list_vehicle_types(category.id)?;
        catalogue.push(CategoryVehicles {
            category,
            vehicle_types,
        });
    }

    Ok(catalogue)
}

fn write_estimate_line(out: &mut String, estimate: &EstimateRecord) {
    let route = match (&estimate.start_name, &estimate.end_name) {
        (Some(start), Some(end)) => format!("{} → {}", start, end),
        (Some(start), None) => format!("from {}", start),
        (None, Some(end)) => format!("to {}", end),
        (None, None) => "unnamed trip".to_string(),
    };

    let _ = writeln!(
        out,
        "#{:<4} {:<32} {:>8.1} km {:>7.2} l {:>14}  {}",
        estimate.id,
        route,
        estimate.distance_km,
        estimate.liters_used,
        format_rupiah(estimate.total_cost),
        estimate.vehicle_name.as_deref().unwrap_or("-")
    );
}

/// Renders the dashboard as text
pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let counts = &dashboard.counts;
    let mut out = String::new();

    let _ = writeln!(out, "=== Fuel Scout Statistics ===\n");
    let _ = writeln!(out, "Vehicle categories: {}", counts.vehicle_categories);
    let _ = writeln!(out, "Vehicle types:      {}", counts.vehicle_types);
    let _ = writeln!(out, "Fuel providers:     {}", counts.providers);
    let _ = writeln!(out, "Fuel prices:        {}", counts.prices);
    let _ = writeln!(out, "Estimates:          {}", counts.estimates);

    let _ = writeln!(out, "\nRecent estimates:");
    if dashboard.recent_estimates.is_empty() {
        let _ = writeln!(out, "  none yet");
    }
    for estimate in &dashboard.recent_estimates {
        out.push_str("  ");
        write_estimate_line(&mut out, estimate);
    }

    out
}

/// Renders the estimate history, newest first
pub fn format_estimate_history(estimates: &[EstimateRecord]) -> String {
    if estimates.is_empty() {
        return "No estimates recorded.\n".to_string();
    }

    let mut out = String::new();
    for estimate in estimates {
        write_estimate_line(&mut out, estimate);
    }
    out
}

/// Renders categories and their vehicle types
pub fn format_vehicle_catalogue(catalogue: &[CategoryVehicles]) -> String {
    if catalogue.is_empty() {
        return "No vehicle categories. Add one with `vehicle category add`.\n".to_string();
    }

    let mut out = String::new();
    for entry in catalogue {
        let _ = writeln!(
            out,
            "{} (category #{}, default {} km/l)",
            entry.category.name, entry.category.id, entry.category.default_kml
        );
        for vehicle in &entry.vehicle_types {
            let _ = writeln!(
                out,
                "  #{:<4} {:<28} {:>6} km/l",
                vehicle.id, vehicle.name, vehicle.km_per_liter
            );
        }
    }
    out
}

pub fn print_dashboard(dashboard: &Dashboard) {
    print!("{}", format_dashboard(dashboard));
}

pub fn print_estimate_history(estimates: &[EstimateRecord]) {
    print!("{}", format_estimate_history(estimates));
}

pub fn print_vehicle_catalogue(catalogue: &[CategoryVehicles]) {
    print!("{}", format_vehicle_catalogue(catalogue));
}
