//! Fuel-type classification by keyword
//!
//! Product names are matched case-insensitively against keyword groups in
//! table order. The first group with a hit decides the grade, so diesel
//! keywords must stay ahead of the octane groups and the higher octane
//! groups ahead of the lower ones.

use crate::fuel::FuelType;

/// Ordered (keywords, grade) table consulted by `classify`
pub const CLASSIFICATION_RULES: &[(&[&str], FuelType)] = &[
    (&["diesel", "dex", "solar"], FuelType::Diesel),
    (&["nitro", "turbo", "98"], FuelType::Ron98),
    (&["ultimate", "v-power", "95"], FuelType::Ron95),
    (&["super", "pertamax", "92"], FuelType::Ron92),
    (&["pertalite", "90"], FuelType::Ron90),
];

/// Grade used when no keyword matches
const DEFAULT_FUEL_TYPE: FuelType = FuelType::Ron92;

/// Classifies a fuel product name into a normalized grade
///
/// # Example
///
/// ```
/// use fuel_scout::fuel::{classify, FuelType};
///
/// assert_eq!(classify("Pertamax Turbo"), FuelType::Ron98);
/// assert_eq!(classify("Shell V-Power Diesel"), FuelType::Diesel);
/// ```
pub fn classify(name: &str) -> FuelType {
    let lower = name.to_lowercase();

    CLASSIFICATION_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(_, fuel_type)| *fuel_type)
        .unwrap_or(DEFAULT_FUEL_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_products() {
        assert_eq!(classify("Pertamax Turbo 98"), FuelType::Ron98);
        assert_eq!(classify("Pertamax"), FuelType::Ron92);
        assert_eq!(classify("Pertalite"), FuelType::Ron90);
        assert_eq!(classify("Pertamina Dex"), FuelType::Diesel);
        assert_eq!(classify("Dexlite"), FuelType::Diesel);
        assert_eq!(classify("Shell Super"), FuelType::Ron92);
        assert_eq!(classify("Shell V-Power"), FuelType::Ron95);
        assert_eq!(classify("Shell V-Power Nitro+"), FuelType::Ron98);
        assert_eq!(classify("BP Ultimate"), FuelType::Ron95);
        assert_eq!(classify("BP 92"), FuelType::Ron92);
    }

    #[test]
    fn test_default_when_nothing_matches() {
        assert_eq!(classify("Unbranded XYZ"), FuelType::Ron92);
        assert_eq!(classify(""), FuelType::Ron92);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("PERTALITE"), FuelType::Ron90);
        assert_eq!(classify("bp ULTIMATE diesel"), FuelType::Diesel);
    }

    #[test]
    fn test_solar_always_wins() {
        for name in [
            "Biosolar Subsidi",
            "Biosolar Non Subsidi",
            "SOLAR 92",
            "Solar 98 Turbo",
            "pertamax solar 95",
        ] {
            assert_eq!(classify(name), FuelType::Diesel, "{}", name);
        }
    }

    #[test]
    fn test_priority_order() {
        // Higher groups shadow lower ones when a name hits several
        assert_eq!(classify("Turbo 92"), FuelType::Ron98);
        assert_eq!(classify("98 / 92"), FuelType::Ron98);
        assert_eq!(classify("Ultimate 92"), FuelType::Ron95);
        assert_eq!(classify("Pertamax 90"), FuelType::Ron92);
        assert_eq!(classify("Super 90"), FuelType::Ron92);
        assert_eq!(classify("Pertamax Green 95"), FuelType::Ron95);
    }

    #[test]
    fn test_rule_table_order() {
        let order: Vec<FuelType> = CLASSIFICATION_RULES.iter().map(|(_, t)| *t).collect();
        assert_eq!(
            order,
            vec![
                FuelType::Diesel,
                FuelType::Ron98,
                FuelType::Ron95,
                FuelType::Ron92,
                FuelType::Ron90,
            ]
        );
    }
}
