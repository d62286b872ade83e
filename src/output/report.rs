//! Scrape reports, scrape log listings and trip estimates

use crate::estimate::EstimateOutcome;
use crate::output::format_rupiah;
use crate::scraper::ScrapeReport;
use crate::storage::{RunRecord, ScrapeLogRecord, ScrapeStatus, Storage};
use crate::FuelError;
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// A stored run with its log entries
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run: RunRecord,
    pub duration_seconds: Option<u64>,
    pub logs: Vec<ScrapeLogRecord>,
}

/// Loads a run and its log entries
///
/// # Arguments
///
/// * `storage` - The storage backend to query
/// * `run_id` - Run to load, or `None` for the latest run
///
/// # Returns
///
/// * `Ok(Some(RunSummary))` - The run was found
/// * `Ok(None)` - No run requested and none recorded yet
/// * `Err(FuelError)` - The requested run does not exist or the query failed
pub fn load_run_summary(
    storage: &dyn Storage,
    run_id: Option<i64>,
) -> Result<Option<RunSummary>, FuelError> {
    let run = match run_id {
        Some(id) => storage.get_run(id)?,
        None => match storage.get_latest_run()? {
            Some(run) => run,
            None => return Ok(None),
        },
    };

    // Duration is only known once the run has finished
    let duration_seconds = match (
        run.started_at.parse::<DateTime<Utc>>(),
        run.finished_at.as_deref().map(str::parse::<DateTime<Utc>>),
    ) {
        (Ok(started), Some(Ok(finished))) => {
            Some((finished - started).num_seconds().max(0) as u64)
        }
        _ => None,
    };

    let logs = storage.scrape_logs_for_run(run.id)?;

    Ok(Some(RunSummary {
        run,
        duration_seconds,
        logs,
    }))
}

/// Renders a run header followed by its log entries
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let run = &summary.run;

    let _ = writeln!(out, "=== Scrape Run #{} ===\n", run.id);
    let _ = writeln!(out, "  Status: {}", run.status.to_db_string());
    let _ = writeln!(out, "  Started: {}", run.started_at);
    if let Some(finished) = &run.finished_at {
        let _ = writeln!(out, "  Finished: {}", finished);
    }
    if let Some(seconds) = summary.duration_seconds {
        let _ = writeln!(out, "  Duration: {}s", seconds);
    }
    let _ = writeln!(out, "  Config hash: {}", run.config_hash);
    out.push('\n');

    out.push_str(&format_scrape_logs(&summary.logs));
    out
}

/// Renders scrape log entries, one per line
pub fn format_scrape_logs(logs: &[ScrapeLogRecord]) -> String {
    let mut out = String::new();

    if logs.is_empty() {
        let _ = writeln!(out, "No scrape log entries.");
        return out;
    }

    for log in logs {
        let marker = match log.status {
            ScrapeStatus::Success => "✓",
            ScrapeStatus::Failed => "✗",
        };
        let run = log
            .run_id
            .map(|id| format!("run #{}", id))
            .unwrap_or_else(|| "no run".to_string());

        let _ = write!(
            out,
            "{} {} {:<10} {:<7} ({})",
            marker, log.created_at, log.provider, log.status, run
        );
        if let Some(message) = &log.message {
            let _ = write!(out, " {}", message);
        }
        out.push('\n');
    }

    out
}

/// Renders the outcome of a scrape run
pub fn format_scrape_report(report: &ScrapeReport) -> String {
    let mut out = String::new();

    match report.run_id {
        Some(id) => {
            let _ = writeln!(out, "=== Scrape Run #{} ===\n", id);
        }
        None => {
            let _ = writeln!(out, "=== Scrape Run (not recorded) ===\n");
        }
    }

    for outcome in &report.outcomes {
        match &outcome.error {
            None => {
                let _ = writeln!(out, "  ✓ {}: {} prices", outcome.provider, outcome.count);
            }
            Some(error) => {
                let _ = writeln!(out, "  ✗ {}: {}", outcome.provider, error);
            }
        }
    }

    let _ = writeln!(
        out,
        "\nTotal scraped: {} prices ({} providers ok, {} failed)",
        report.prices.len(),
        report.succeeded(),
        report.failed()
    );

    match report.persisted {
        Some(count) => {
            let _ = writeln!(out, "Saved {} prices", count);
        }
        None => {
            let _ = writeln!(out, "Nothing saved");
        }
    }

    out
}

/// Renders a recorded trip estimate
pub fn format_estimate(outcome: &EstimateOutcome) -> String {
    let price = &outcome.price;
    let estimate = &outcome.estimate;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Fuel: {} {} ({}) at {}/l",
        price.provider_name,
        price.fuel_name,
        price.fuel_type,
        format_rupiah(estimate.price_per_liter)
    );
    if let Some(vehicle) = &outcome.vehicle_name {
        let _ = writeln!(out, "Vehicle: {}", vehicle);
    }
    let _ = writeln!(
        out,
        "Trip: {} km at {} km/l",
        estimate.distance_km, estimate.km_per_liter
    );
    let _ = writeln!(out, "Fuel needed: {:.2} l", estimate.liters);
    let _ = writeln!(out, "Estimated cost: {}", format_rupiah(estimate.total_cost));
    let _ = writeln!(out, "Saved as estimate #{}", outcome.history_id);

    out
}

pub fn print_run_summary(summary: &RunSummary) {
    print!("{}", format_run_summary(summary));
}

pub fn print_scrape_logs(logs: &[ScrapeLogRecord]) {
    print!("{}", format_scrape_logs(logs));
}

pub fn print_scrape_report(report: &ScrapeReport) {
    print!("{}", format_scrape_report(report));
}

pub fn print_estimate(outcome: &EstimateOutcome) {
    print!("{}", format_estimate(outcome));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::estimate_trip;
    use crate::fuel::FuelType;
    use crate::storage::PriceRecord;
    use crate::scraper::ProviderOutcome;
    use crate::storage::{RunStatus, SqliteStorage};

    #[test]
    fn test_run_summary_for_finished_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("deadbeef").unwrap();
        storage
            .append_scrape_log(Some(run_id), "Shell", ScrapeStatus::Success, Some("Scraped 4 prices"))
            .unwrap();
        storage.finish_run(run_id, RunStatus::Completed).unwrap();

        let summary = load_run_summary(&storage, None).unwrap().unwrap();
        assert_eq!(summary.run.id, run_id);
        assert!(summary.duration_seconds.is_some());
        assert_eq!(summary.logs.len(), 1);

        let text = format_run_summary(&summary);
        assert!(text.contains("Status: completed"));
        assert!(text.contains("Config hash: deadbeef"));
        assert!(text.contains("Shell"));
        assert!(text.contains("Scraped 4 prices"));
    }

    #[test]
    fn test_run_summary_missing() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(load_run_summary(&storage, None).unwrap().is_none());
        assert!(load_run_summary(&storage, Some(3)).is_err());
    }

    #[test]
    fn test_format_scrape_logs() {
        let logs = vec![ScrapeLogRecord {
            id: 1,
            run_id: None,
            provider: "BP".to_string(),
            status: ScrapeStatus::Failed,
            message: Some("BP failed during navigate: timeout".to_string()),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        }];

        let text = format_scrape_logs(&logs);
        assert!(text.starts_with("✗"));
        assert!(text.contains("FAILED"));
        assert!(text.contains("no run"));
        assert!(text.contains("failed during navigate"));

        assert_eq!(format_scrape_logs(&[]), "No scrape log entries.\n");
    }

    #[test]
    fn test_format_scrape_report() {
        let report = ScrapeReport {
            run_id: Some(7),
            prices: Vec::new(),
            outcomes: vec![
                ProviderOutcome {
                    provider: "Pertamina".to_string(),
                    status: ScrapeStatus::Failed,
                    count: 0,
                    error: Some("timeout".to_string()),
                },
                ProviderOutcome {
                    provider: "Shell".to_string(),
                    status: ScrapeStatus::Success,
                    count: 0,
                    error: None,
                },
            ],
            persisted: None,
        };

        let text = format_scrape_report(&report);
        assert!(text.contains("Scrape Run #7"));
        assert!(text.contains("✗ Pertamina: timeout"));
        assert!(text.contains("✓ Shell: 0 prices"));
        assert!(text.contains("1 providers ok, 1 failed"));
        assert!(text.contains("Nothing saved"));
    }

    #[test]
    fn test_format_estimate() {
        let price = PriceRecord {
            id: 3,
            provider_id: 1,
            provider_name: "Pertamina".to_string(),
            fuel_name: "Pertamax".to_string(),
            fuel_type: FuelType::Ron92,
            price: 12950,
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        };
        let estimate = estimate_trip(120.0, 12.0, price.price).unwrap();
        let outcome = EstimateOutcome {
            history_id: 4,
            price,
            vehicle_name: Some("Avanza (Mobil)".to_string()),
            estimate,
        };

        let text = format_estimate(&outcome);
        assert!(text.contains("Pertamina Pertamax (RON92) at Rp 12.950/l"));
        assert!(text.contains("Vehicle: Avanza (Mobil)"));
        assert!(text.contains("Saved as estimate #4"));
        assert!(text.contains("Fuel needed: 10.00 l"));
        assert!(text.contains("Estimated cost: Rp 129.500"));
    }
}
