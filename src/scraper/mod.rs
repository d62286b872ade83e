//! Provider scrapers and the scrape orchestrator
//!
//! Every provider scraper walks the same stages over a shared `PageDriver`:
//! navigate, optionally dismiss a consent overlay, wait for the price table,
//! extract rows, keep the target region, then parse and classify prices.
//! The orchestrator runs the scrapers one after another and isolates their
//! failures from each other.

mod bp;
mod orchestrator;
mod pertamina;
mod shell;
mod stage;

pub use bp::BpScraper;
pub use orchestrator::{Orchestrator, ProviderOutcome, ScrapeReport};
pub use pertamina::{PertaminaScraper, PERTAMINA_FUEL_COLUMNS};
pub use shell::ShellScraper;
pub use stage::{ScrapeError, ScrapeStage, StageExt};

use crate::browser::PageDriver;
use crate::config::{Config, ScraperConfig};
use crate::fuel::{classify, parse_price, FuelPriceRecord};
use async_trait::async_trait;
use std::time::Duration;

/// One provider's price page scraper
#[async_trait]
pub trait ProviderScraper: Send + Sync {
    /// Provider name written to prices and scrape logs
    fn provider_name(&self) -> &str;

    /// Scrapes the provider's current prices for the configured region
    ///
    /// An empty result is valid. Navigation and wait failures are returned
    /// as-is, tagged with the stage that failed.
    async fn scrape(&self, page: &mut dyn PageDriver)
        -> Result<Vec<FuelPriceRecord>, ScrapeError>;
}

/// Settings shared by all provider scrapers
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub region: String,
    pub content_timeout: Duration,
    pub consent_timeout: Duration,
    pub settle_delay: Duration,
}

impl From<&ScraperConfig> for ScrapeSettings {
    fn from(config: &ScraperConfig) -> Self {
        Self {
            region: config.region.clone(),
            content_timeout: config.content_timeout(),
            consent_timeout: config.consent_timeout(),
            settle_delay: config.settle_delay(),
        }
    }
}

/// Builds the scrapers in their fixed run order: Pertamina, Shell, BP
pub fn default_scrapers(config: &Config) -> Vec<Box<dyn ProviderScraper>> {
    let settings = ScrapeSettings::from(&config.scraper);

    vec![
        Box::new(PertaminaScraper::new(
            config.sources.pertamina_url.clone(),
            settings.clone(),
        )),
        Box::new(ShellScraper::new(
            config.sources.shell_url.clone(),
            settings.clone(),
        )),
        Box::new(BpScraper::new(config.sources.bp_url.clone(), settings)),
    ]
}

/// Turns one raw (name, price) pair into a record
///
/// Rows with an empty name or a price without digits are dropped.
pub(crate) fn price_record(
    provider: &str,
    name: &str,
    raw_price: &str,
) -> Option<FuelPriceRecord> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let price = parse_price(raw_price)?;
    Some(FuelPriceRecord::new(provider, name, classify(name), price))
}

/// Case-insensitive "contains the region" test used for region filtering
pub(crate) fn matches_region(text: &str, region: &str) -> bool {
    text.to_lowercase().contains(&region.trim().to_lowercase())
}

/// Runs one full scrape: opens storage, launches the browser, runs every
/// provider and releases the browser again
///
/// # Arguments
///
/// * `config` - Loaded configuration
/// * `config_hash` - Hash of the config file, stored on the run
///
/// # Returns
///
/// * `Ok(ScrapeReport)` - The run completed (individual providers may have failed)
/// * `Err(FuelError)` - Storage could not be opened or the browser could not start
#[cfg(feature = "browser")]
pub async fn run_scrape(config: &Config, config_hash: &str) -> crate::Result<ScrapeReport> {
    use crate::browser::BrowserSession;
    use crate::storage::open_storage;
    use std::path::Path;

    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let orchestrator = Orchestrator::from_config(config, config_hash);

    let session = BrowserSession::launch(&config.browser).await?;
    let mut page = match session.new_page().await {
        Ok(page) => page,
        Err(e) => {
            session.close().await;
            return Err(e);
        }
    };

    let report = orchestrator.run(&mut page, &mut storage).await;

    page.close().await;
    session.close().await;

    Ok(report)
}

/// Runs one full scrape
///
/// This build has no browser support, so it always fails.
#[cfg(not(feature = "browser"))]
pub async fn run_scrape(_config: &Config, _config_hash: &str) -> crate::Result<ScrapeReport> {
    Err(crate::FuelError::Browser(
        "fuel-scout was built without the `browser` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::fuel::FuelType;

    #[test]
    fn test_price_record_drops_noise() {
        assert!(price_record("Shell", "", "14.800").is_none());
        assert!(price_record("Shell", "   ", "14.800").is_none());
        assert!(price_record("Shell", "Shell Super", "-").is_none());
        assert!(price_record("Shell", "Shell Super", "").is_none());

        let record = price_record("Shell", " Shell V-Power ", "Rp 14.250").unwrap();
        assert_eq!(record.fuel_name, "Shell V-Power");
        assert_eq!(record.fuel_type, FuelType::Ron95);
        assert_eq!(record.price, 14250);
    }

    #[test]
    fn test_matches_region() {
        assert!(matches_region("JAWA TIMUR", "Jawa Timur"));
        assert!(matches_region("Prov. Jawa Timur (Surabaya)", "jawa timur "));
        assert!(!matches_region("Jawa Barat", "Jawa Timur"));
    }

    #[test]
    fn test_default_scrapers_order() {
        let config = parse_config(
            r#"
[output]
database-path = "fuel.db"
"#,
        )
        .unwrap();

        let names: Vec<String> = default_scrapers(&config)
            .iter()
            .map(|s| s.provider_name().to_string())
            .collect();
        assert_eq!(names, vec!["Pertamina", "Shell", "BP"]);
    }
}
