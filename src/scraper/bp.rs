//! BP price page scraper
//!
//! The price table has one column per region. Its first body row carries
//! the region labels, every later row a product name in its `<th>` cell and
//! one price per region in its `<td>` cells.

use crate::browser::{PageDriver, Row};
use crate::config::DEFAULT_REGION;
use crate::fuel::FuelPriceRecord;
use crate::scraper::{
    matches_region, price_record, ProviderScraper, ScrapeError, ScrapeSettings, ScrapeStage,
    StageExt,
};
use async_trait::async_trait;

const PROVIDER: &str = "BP";
const CONSENT_BUTTON: &str = "button.nr-cookie-accept";
const TABLE_SELECTOR: &str = ".nr-table-component table";
const ROW_SELECTOR: &str = ".nr-table-component table tbody tr";

/// Data column of the default region, used when the header row is unlabeled
const DEFAULT_REGION_COLUMN: usize = 1;

pub struct BpScraper {
    url: String,
    settings: ScrapeSettings,
}

impl BpScraper {
    pub fn new(url: impl Into<String>, settings: ScrapeSettings) -> Self {
        Self {
            url: url.into(),
            settings,
        }
    }

    /// Accepts the cookie banner if it shows up in time
    ///
    /// Never fails: a missing or unclickable banner is only logged.
    async fn dismiss_consent(&self, page: &mut dyn PageDriver) {
        match page
            .is_visible(CONSENT_BUTTON, self.settings.consent_timeout)
            .await
        {
            Ok(true) => {
                tracing::info!("Accepting {} cookies", PROVIDER);
                match page.click(CONSENT_BUTTON).await {
                    Ok(()) => page.settle(self.settings.settle_delay).await,
                    Err(e) => tracing::debug!("{}: consent click failed: {}", PROVIDER, e),
                }
            }
            Ok(false) => tracing::debug!("{}: no cookie popup", PROVIDER),
            Err(e) => tracing::debug!("{}: cookie popup check failed: {}", PROVIDER, e),
        }
    }

    /// Picks the data column for the configured region
    ///
    /// Only the default region may fall back to its known column when the
    /// header does not name it; any other region without a header match
    /// has no column.
    fn price_column(&self, header: &Row) -> Option<usize> {
        if let Some(column) = region_column(header, &self.settings.region) {
            return Some(column);
        }

        if !DEFAULT_REGION.eq_ignore_ascii_case(self.settings.region.trim()) {
            return None;
        }

        tracing::warn!(
            "{}: header does not name '{}', using column {}",
            PROVIDER,
            self.settings.region,
            DEFAULT_REGION_COLUMN
        );
        Some(DEFAULT_REGION_COLUMN)
    }
}

/// Finds the `<td>` index holding `region` prices from the header row
///
/// The header's first label sits above the product name column, so label
/// `n` maps to data cell `n - 1`.
fn region_column(header: &Row, region: &str) -> Option<usize> {
    header
        .headers
        .iter()
        .chain(header.cells.iter())
        .position(|label| matches_region(label, region))
        .filter(|&position| position > 0)
        .map(|position| position - 1)
}

#[async_trait]
impl ProviderScraper for BpScraper {
    fn provider_name(&self) -> &str {
        PROVIDER
    }

    async fn scrape(
        &self,
        page: &mut dyn PageDriver,
    ) -> Result<Vec<FuelPriceRecord>, ScrapeError> {
        tracing::info!("Scraping {}", PROVIDER);

        page.navigate(&self.url)
            .await
            .during(PROVIDER, ScrapeStage::Navigate)?;

        tracing::debug!("{}: {}", PROVIDER, ScrapeStage::DismissConsent);
        self.dismiss_consent(page).await;

        page.wait_for_selector(TABLE_SELECTOR, self.settings.content_timeout)
            .await
            .during(PROVIDER, ScrapeStage::WaitForContent)?;

        let rows = page
            .extract_rows(ROW_SELECTOR)
            .await
            .during(PROVIDER, ScrapeStage::ExtractRows)?;
        let Some((header, products)) = rows.split_first() else {
            tracing::debug!("{}: price table is empty", PROVIDER);
            return Ok(Vec::new());
        };

        let Some(column) = self.price_column(header) else {
            tracing::warn!(
                "{}: no '{}' column in price table header, skipping",
                PROVIDER,
                self.settings.region
            );
            return Ok(Vec::new());
        };

        let records: Vec<FuelPriceRecord> = products
            .iter()
            .filter_map(|row| price_record(PROVIDER, row.header(0), row.cell(column)))
            .collect();

        tracing::debug!("{}: {} ({} prices)", PROVIDER, ScrapeStage::Done, records.len());
        Ok(records)
    }
}
