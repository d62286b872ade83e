//! Provider price board
//!
//! Loads every provider with its stored prices and renders them as a plain
//! text table.

use crate::output::format_rupiah;
use crate::storage::{PriceRecord, ProviderRecord, Storage};
use crate::FuelError;
use std::fmt::Write;

/// One provider and its prices, ordered by fuel name
#[derive(Debug, Clone)]
pub struct ProviderPrices {
    pub provider: ProviderRecord,
    pub prices: Vec<PriceRecord>,
}

/// All stored prices grouped by provider
#[derive(Debug, Clone, Default)]
pub struct PriceBoard {
    /// Providers ordered by name
    pub providers: Vec<ProviderPrices>,
}

impl PriceBoard {
    pub fn total_prices(&self) -> usize {
        self.providers.iter().map(|p| p.prices.len()).sum()
    }
}

/// Loads the price board from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(PriceBoard)` - Providers with their prices
/// * `Err(FuelError)` - Failed to query storage
pub fn load_price_board(storage: &dyn Storage) -> Result<PriceBoard, FuelError> {
    let mut providers = Vec::new();

    for provider in storage.list_providers()? {
        let prices = storage.list_prices(provider.id)?;
        providers.push(ProviderPrices { provider, prices });
    }

    Ok(PriceBoard { providers })
}

/// Renders the board as text
pub fn format_price_board(board: &PriceBoard) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Fuel Prices ===\n");

    if board.providers.is_empty() {
        let _ = writeln!(out, "No providers stored yet. Run `scrape` first.");
        return out;
    }

    for entry in &board.providers {
        let _ = writeln!(
            out,
            "{} (provider #{}, {} prices)",
            entry.provider.name,
            entry.provider.id,
            entry.prices.len()
        );

        for price in &entry.prices {
            let _ = writeln!(
                out,
                "  #{:<4} {:<28} {:<7} {:>12}",
                price.id,
                price.fuel_name,
                price.fuel_type.to_db_string(),
                format_rupiah(price.price)
            );
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "{} providers, {} prices",
        board.providers.len(),
        board.total_prices()
    );

    out
}

/// Prints the board to stdout
pub fn print_price_board(board: &PriceBoard) {
    print!("{}", format_price_board(board));
}
