//! Trip fuel cost estimation
//!
//! Given a distance, a vehicle's consumption and a stored price per liter,
//! works out how much fuel a trip needs and what it costs. Consumption comes
//! from the vehicle catalogue or an explicit km/l figure, and every estimate
//! is written to the history table.

use crate::storage::{NewEstimate, PriceRecord, Storage};
use crate::FuelError;
use thiserror::Error;

/// Errors for invalid estimate inputs
#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("Fuel consumption must be greater than zero, got {0} km/l")]
    InvalidConsumption(f64),

    #[error("Distance must be a finite, non-negative number of kilometers, got {0}")]
    InvalidDistance(f64),

    #[error("No fuel consumption given: pass a vehicle category or km/l")]
    MissingConsumption,
}

/// Fuel needed and total cost for one trip
#[derive(Debug, Clone, PartialEq)]
pub struct TripEstimate {
    pub distance_km: f64,
    pub km_per_liter: f64,
    /// Price per liter used for the estimate
    pub price_per_liter: i64,
    /// Fuel needed, rounded to two decimals
    pub liters: f64,
    /// Total cost, rounded to whole currency units
    pub total_cost: i64,
}

/// Estimates the fuel a trip needs and its cost
///
/// Liters are rounded to two decimals for display, while the cost is
/// computed from the unrounded amount and rounded to the nearest unit.
///
/// # Example
///
/// ```
/// use fuel_scout::estimate::estimate_trip;
///
/// let estimate = estimate_trip(100.0, 12.0, 10000).unwrap();
/// assert_eq!(estimate.liters, 8.33);
/// assert_eq!(estimate.total_cost, 83333);
/// ```
pub fn estimate_trip(
    distance_km: f64,
    km_per_liter: f64,
    price_per_liter: i64,
) -> Result<TripEstimate, EstimateError> {
    if !km_per_liter.is_finite() || km_per_liter <= 0.0 {
        return Err(EstimateError::InvalidConsumption(km_per_liter));
    }
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(EstimateError::InvalidDistance(distance_km));
    }

    let liters = distance_km / km_per_liter;
    let total_cost = (liters * price_per_liter as f64).round() as i64;

    Ok(TripEstimate {
        distance_km,
        km_per_liter,
        price_per_liter,
        liters: (liters * 100.0).round() / 100.0,
        total_cost,
    })
}

/// What to estimate: the price, the distance and where consumption comes from
#[derive(Debug, Clone, Default)]
pub struct EstimateRequest {
    pub price_id: i64,
    pub distance_km: f64,
    /// Vehicle category whose default consumption is used
    pub category_id: Option<i64>,
    /// Vehicle type overriding the category's consumption
    pub vehicle_type_id: Option<i64>,
    /// Explicit consumption, overriding the catalogue
    pub km_per_liter: Option<f64>,
    pub start_name: Option<String>,
    pub end_name: Option<String>,
}

/// Consumption resolved from the catalogue and overrides
#[derive(Debug, Clone, PartialEq)]
pub struct Consumption {
    pub km_per_liter: f64,
    /// Display name of the vehicle, if one was picked from the catalogue
    pub vehicle_name: Option<String>,
}

/// A recorded estimate with the price and vehicle it used
#[derive(Debug, Clone)]
pub struct EstimateOutcome {
    pub history_id: i64,
    pub price: PriceRecord,
    pub vehicle_name: Option<String>,
    pub estimate: TripEstimate,
}

/// Resolves the km/l to use for an estimate
///
/// The category's default applies first. A vehicle type in that category
/// replaces it and names the vehicle "Type (Category)"; a missing or
/// mismatched type is skipped with a warning. An explicit km/l wins over both.
///
/// # Returns
///
/// * `Ok(Consumption)` - The km/l and vehicle name to use
/// * `Err(FuelError::NotFound)` - The category does not exist
/// * `Err(FuelError::Estimate)` - Neither a category nor km/l was given
pub fn resolve_consumption(
    storage: &dyn Storage,
    category_id: Option<i64>,
    vehicle_type_id: Option<i64>,
    km_per_liter: Option<f64>,
) -> Result<Consumption, FuelError> {
    let mut resolved = match category_id {
        Some(category_id) => {
            let category = storage
                .get_vehicle_category(category_id)?
                .ok_or_else(|| FuelError::NotFound(format!("vehicle category {}", category_id)))?;

            let mut consumption = Consumption {
                km_per_liter: category.default_kml,
                vehicle_name: Some(category.name.clone()),
            };

            if let Some(type_id) = vehicle_type_id {
                match storage.get_vehicle_type(type_id)? {
                    Some(vehicle) if vehicle.category_id == category.id => {
                        consumption.km_per_liter = vehicle.km_per_liter;
                        consumption.vehicle_name =
                            Some(format!("{} ({})", vehicle.name, category.name));
                    }
                    Some(_) => tracing::warn!(
                        "Vehicle type {} is not in category '{}', using the category default",
                        type_id,
                        category.name
                    ),
                    None => tracing::warn!(
                        "Vehicle type {} not found, using the '{}' default",
                        type_id,
                        category.name
                    ),
                }
            }

            Some(consumption)
        }
        None => None,
    };

    if let Some(km_per_liter) = km_per_liter {
        match resolved.as_mut() {
            Some(consumption) => consumption.km_per_liter = km_per_liter,
            None => {
                resolved = Some(Consumption {
                    km_per_liter,
                    vehicle_name: None,
                })
            }
        }
    }

    resolved.ok_or_else(|| EstimateError::MissingConsumption.into())
}

/// Estimates a trip and records it in the estimate history
///
/// # Returns
///
/// * `Ok(EstimateOutcome)` - The recorded estimate
/// * `Err(FuelError::NotFound)` - The price or category does not exist
/// * `Err(FuelError::Estimate)` - Distance or consumption is invalid
/// * `Err(FuelError::StorageError)` - The history entry could not be written
pub fn estimate_and_record(
    storage: &mut dyn Storage,
    request: &EstimateRequest,
) -> Result<EstimateOutcome, FuelError> {
    let price = storage
        .get_price(request.price_id)?
        .ok_or_else(|| FuelError::NotFound(format!("price {}", request.price_id)))?;

    let consumption = resolve_consumption(
        &*storage,
        request.category_id,
        request.vehicle_type_id,
        request.km_per_liter,
    )?;

    let estimate = estimate_trip(request.distance_km, consumption.km_per_liter, price.price)?;

    let history_id = storage.record_estimate(&NewEstimate {
        start_name: request.start_name.clone(),
        end_name: request.end_name.clone(),
        vehicle_name: consumption.vehicle_name.clone(),
        distance_km: estimate.distance_km,
        liters_used: estimate.liters,
        total_cost: estimate.total_cost,
    })?;

    tracing::debug!("Recorded estimate {} ({} liters)", history_id, estimate.liters);

    Ok(EstimateOutcome {
        history_id,
        price,
        vehicle_name: consumption.vehicle_name,
        estimate,
    })
}
