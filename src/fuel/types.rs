use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Normalized fuel grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    #[serde(rename = "RON90")]
    Ron90,
    #[serde(rename = "RON92")]
    Ron92,
    #[serde(rename = "RON95")]
    Ron95,
    #[serde(rename = "RON98")]
    Ron98,
    Diesel,
}

impl FuelType {
    /// Converts the fuel type to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Ron90 => "RON90",
            Self::Ron92 => "RON92",
            Self::Ron95 => "RON95",
            Self::Ron98 => "RON98",
            Self::Diesel => "Diesel",
        }
    }

    /// Parses a fuel type from its database string representation
    ///
    /// Returns None if the string doesn't match any known grade.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "RON90" => Some(Self::Ron90),
            "RON92" => Some(Self::Ron92),
            "RON95" => Some(Self::Ron95),
            "RON98" => Some(Self::Ron98),
            "Diesel" => Some(Self::Diesel),
            _ => None,
        }
    }

    /// Returns all fuel types
    pub fn all() -> [Self; 5] {
        [
            Self::Ron90,
            Self::Ron92,
            Self::Ron95,
            Self::Ron98,
            Self::Diesel,
        ]
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// Error returned when text does not name a fuel grade
#[derive(Debug, Error)]
#[error("unknown fuel type '{0}' (expected RON90, RON92, RON95, RON98 or Diesel)")]
pub struct ParseFuelTypeError(pub String);

impl FromStr for FuelType {
    type Err = ParseFuelTypeError;

    /// Accepts the database spelling as well as "RON 92", "ron92" and "diesel"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        match compact.as_str() {
            "RON90" => Ok(Self::Ron90),
            "RON92" => Ok(Self::Ron92),
            "RON95" => Ok(Self::Ron95),
            "RON98" => Ok(Self::Ron98),
            "DIESEL" => Ok(Self::Diesel),
            _ => Err(ParseFuelTypeError(s.to_string())),
        }
    }
}

/// A single scraped fuel price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelPriceRecord {
    /// Provider display name (e.g. "Shell")
    pub provider: String,

    /// Product name as shown on the provider's page
    pub fuel_name: String,

    /// Normalized grade
    pub fuel_type: FuelType,

    /// Price in currency units per liter
    pub price: i64,
}

impl FuelPriceRecord {
    pub fn new(
        provider: impl Into<String>,
        fuel_name: impl Into<String>,
        fuel_type: FuelType,
        price: i64,
    ) -> Self {
        Self {
            provider: provider.into(),
            fuel_name: fuel_name.into(),
            fuel_type,
            price,
        }
    }
}
