//! Shell price page scraper
//!
//! One table lists every (product, location, price) combination. The first
//! row is the header.

use crate::browser::PageDriver;
use crate::fuel::FuelPriceRecord;
use crate::scraper::{
    matches_region, price_record, ProviderScraper, ScrapeError, ScrapeSettings, ScrapeStage,
    StageExt,
};
use async_trait::async_trait;

const PROVIDER: &str = "Shell";
const ROW_SELECTOR: &str = "table tr";

pub struct ShellScraper {
    url: String,
    settings: ScrapeSettings,
}

impl ShellScraper {
    pub fn new(url: impl Into<String>, settings: ScrapeSettings) -> Self {
        Self {
            url: url.into(),
            settings,
        }
    }
}

#[async_trait]
impl ProviderScraper for ShellScraper {
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

        page.wait_for_selector(ROW_SELECTOR, self.settings.content_timeout)
            .await
            .during(PROVIDER, ScrapeStage::WaitForContent)?;

        let rows = page
            .extract_rows(ROW_SELECTOR)
            .await
            .during(PROVIDER, ScrapeStage::ExtractRows)?;

        tracing::debug!(
            "{}: {} rows, keeping {}",
            PROVIDER,
            rows.len().saturating_sub(1),
            self.settings.region
        );

        let records: Vec<FuelPriceRecord> = rows
            .iter()
            .skip(1)
            .filter(|row| matches_region(row.cell(1), &self.settings.region))
            .filter_map(|row| price_record(PROVIDER, row.cell(0), row.cell(2)))
            .collect();

        tracing::debug!("{}: {} ({} prices)", PROVIDER, ScrapeStage::Done, records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::StaticPage;
    use crate::fuel::FuelType;
    use std::time::Duration;

    const URL: &str = "https://shell.test/how-shell-price-fuel.html";

    fn settings() -> ScrapeSettings {
        ScrapeSettings {
            region: "Jawa Timur".to_string(),
            content_timeout: Duration::from_secs(60),
            consent_timeout: Duration::from_secs(8),
            settle_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_keeps_only_target_region() {
        let html = r#"<table>
            <tr><td>Produk</td><td>Lokasi</td><td>Harga</td></tr>
            <tr><td>Pertamax Turbo</td><td>Jawa Timur</td><td>14.800</td></tr>
            <tr><td>Pertalite</td><td>Jawa Barat</td><td>10.000</td></tr>
        </table>"#;
        let mut page = StaticPage::new().with_document(URL, html);

        let records = ShellScraper::new(URL, settings())
            .scrape(&mut page)
            .await
            .unwrap();

        assert_eq!(
            records,
            vec![FuelPriceRecord::new(
                "Shell",
                "Pertamax Turbo",
                FuelType::Ron98,
                14800
            )]
        );
    }

    #[tokio::test]
    async fn test_region_match_ignores_case_and_drops_noise() {
        let html = r#"<table>
            <tr><th>Produk</th><th>Lokasi</th><th>Harga</th></tr>
            <tr><td>Shell Super</td><td>JAWA TIMUR</td><td>Rp 13.590</td></tr>
            <tr><td>Shell V-Power Diesel</td><td>jawa timur, Surabaya</td><td>Rp 14.230</td></tr>
            <tr><td></td><td>Jawa Timur</td><td>Rp 1.000</td></tr>
            <tr><td>Shell V-Power Nitro+</td><td>Jawa Timur</td><td>-</td></tr>
        </table>"#;
        let mut page = StaticPage::new().with_document(URL, html);

        let records = ShellScraper::new(URL, settings())
            .scrape(&mut page)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fuel_type, FuelType::Ron92);
        assert_eq!(records[1].fuel_type, FuelType::Diesel);
        assert_eq!(records[1].price, 14230);
    }

    #[tokio::test]
    async fn test_navigation_failure_names_stage() {
        let mut page = StaticPage::new();

        let err = ShellScraper::new(URL, settings())
            .scrape(&mut page)
            .await
            .unwrap_err();
        assert_eq!(err.provider, "Shell");
        assert_eq!(err.stage, ScrapeStage::Navigate);
    }
}
