//! Console output for prices, scrape logs and reports
//!
//! This module handles:
//! - Loading the provider/price board from storage
//! - Formatting prices, scrape logs, run summaries and trip estimates
//! - The statistics dashboard, estimate history and vehicle listing
//!
//! Every `format_*` function returns the text that the matching `print_*`
//! function writes to stdout.

mod board;
mod dashboard;
mod report;

pub use board::{format_price_board, load_price_board, print_price_board, PriceBoard, ProviderPrices};
pub use dashboard::{
    format_dashboard, format_estimate_history, format_vehicle_catalogue, load_dashboard,
    load_vehicle_catalogue, print_dashboard, print_estimate_history, print_vehicle_catalogue,
    CategoryVehicles, Dashboard, DASHBOARD_RECENT_ESTIMATES,
};
pub use report::{
    format_estimate, format_run_summary, format_scrape_logs, format_scrape_report,
    load_run_summary, print_estimate, print_run_summary, print_scrape_logs, print_scrape_report,
    RunSummary,
};

/// Formats an amount in rupiah with dot thousands separators
///
/// # Example
///
/// ```
/// use fuel_scout::output::format_rupiah;
///
/// assert_eq!(format_rupiah(12950), "Rp 12.950");
/// ```
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if amount < 0 {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(950), "Rp 950");
        assert_eq!(format_rupiah(1000), "Rp 1.000");
        assert_eq!(format_rupiah(14800), "Rp 14.800");
        assert_eq!(format_rupiah(1234567), "Rp 1.234.567");
        assert_eq!(format_rupiah(-2500), "Rp -2.500");
    }
}
