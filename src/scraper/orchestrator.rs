//! Scrape orchestrator
//!
//! Runs every provider scraper in turn on one shared page, records one log
//! entry per provider and persists the combined prices in a single batch.

use crate::browser::{PageDriver, PageError};
use crate::config::Config;
use crate::fuel::FuelPriceRecord;
use crate::scraper::{default_scrapers, ProviderScraper, ScrapeError};
use crate::storage::{RunStatus, ScrapeStatus, Storage};

/// Message logged for a failure whose error has no text
const GENERIC_FAILURE: &str = "Unknown scraping error";

/// Result of one provider within a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOutcome {
    pub provider: String,
    pub status: ScrapeStatus,
    /// Prices scraped (0 on failure)
    pub count: usize,
    /// Error message on failure
    pub error: Option<String>,
}

/// Summary of an orchestrator run
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// ID of the recorded scrape run, if it could be created
    pub run_id: Option<i64>,
    /// Every successfully scraped price, in provider order
    pub prices: Vec<FuelPriceRecord>,
    /// One outcome per provider, in run order
    pub outcomes: Vec<ProviderOutcome>,
    /// Number of prices written, or `None` when nothing was persisted
    pub persisted: Option<usize>,
}

impl ScrapeReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == ScrapeStatus::Success)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Sequential scrape orchestrator
pub struct Orchestrator {
    scrapers: Vec<Box<dyn ProviderScraper>>,
    config_hash: String,
}

impl Orchestrator {
    /// Creates an orchestrator over `scrapers`, run in the given order
    pub fn new(scrapers: Vec<Box<dyn ProviderScraper>>, config_hash: impl Into<String>) -> Self {
        Self {
            scrapers,
            config_hash: config_hash.into(),
        }
    }

    /// Creates an orchestrator for Pertamina, Shell and BP
    pub fn from_config(config: &Config, config_hash: impl Into<String>) -> Self {
        Self::new(default_scrapers(config), config_hash)
    }

    /// Provider names in run order
    pub fn providers(&self) -> Vec<&str> {
        self.scrapers.iter().map(|s| s.provider_name()).collect()
    }

    /// Runs every scraper against `page` and records the results in `storage`
    ///
    /// A failing provider never stops the others, and storage failures are
    /// logged rather than returned, so a run always produces a report.
    pub async fn run(&self, page: &mut dyn PageDriver, storage: &mut dyn Storage) -> ScrapeReport {
        let run_id = match storage.create_run(&self.config_hash) {
            Ok(id) => {
                tracing::info!("Starting scrape run {}", id);
                Some(id)
            }
            Err(e) => {
                tracing::error!("Failed to record scrape run: {}", e);
                None
            }
        };

        let mut prices = Vec::new();
        let mut outcomes = Vec::with_capacity(self.scrapers.len());

        for scraper in &self.scrapers {
            let provider = scraper.provider_name();

            let outcome = match scraper.scrape(&mut *page).await {
                Ok(records) => {
                    let count = records.len();
                    tracing::info!("{} scraped {} prices", provider, count);
                    prices.extend(records);

                    let message = format!("Scraped {} prices", count);
                    write_log(storage, run_id, provider, ScrapeStatus::Success, &message);

                    ProviderOutcome {
                        provider: provider.to_string(),
                        status: ScrapeStatus::Success,
                        count,
                        error: None,
                    }
                }
                Err(e) => {
                    let message = failure_message(&e);
                    tracing::warn!("{} scraping failed, skipping: {}", provider, message);
                    write_log(storage, run_id, provider, ScrapeStatus::Failed, &message);

                    ProviderOutcome {
                        provider: provider.to_string(),
                        status: ScrapeStatus::Failed,
                        count: 0,
                        error: Some(message),
                    }
                }
            };

            outcomes.push(outcome);
        }

        tracing::info!("Total scraped: {} prices", prices.len());

        let persisted = if prices.is_empty() {
            tracing::info!("No prices to save");
            None
        } else {
            match storage.upsert_prices(&prices) {
                Ok(written) => {
                    tracing::info!("Saved {} prices", written);
                    Some(written)
                }
                Err(e) => {
                    tracing::error!("Failed to save prices: {}", e);
                    None
                }
            }
        };

        let report = ScrapeReport {
            run_id,
            prices,
            outcomes,
            persisted,
        };

        if let Some(run_id) = run_id {
            let status = if report.succeeded() > 0 {
                RunStatus::Completed
            } else {
                RunStatus::Failed
            };
            if let Err(e) = storage.finish_run(run_id, status) {
                tracing::error!("Failed to finish scrape run {}: {}", run_id, e);
            }
        }

        report
    }
}

/// Text logged for a failed provider
///
/// Browser errors that carry no detail are reported with a generic message.
fn failure_message(error: &ScrapeError) -> String {
    let detail = match &error.source {
        PageError::Protocol(message) | PageError::Navigation { message, .. } => message,
        _ => return error.to_string(),
    };

    if detail.trim().is_empty() {
        format!(
            "{} failed during {}: {}",
            error.provider, error.stage, GENERIC_FAILURE
        )
    } else {
        error.to_string()
    }
}

/// Appends a scrape log entry, logging instead of failing
fn write_log(
    storage: &mut dyn Storage,
    run_id: Option<i64>,
    provider: &str,
    status: ScrapeStatus,
    message: &str,
) {
    if let Err(e) = storage.append_scrape_log(run_id, provider, status, Some(message)) {
        tracing::error!("Failed to write scraping log for {}: {}", provider, e);
    }
}
