//! Pertamina price page scraper
//!
//! The page lists one row per province. Typing the region into the search
//! box filters the table, after which only the first body row is read.

use crate::browser::{PageDriver, Row};
use crate::fuel::FuelPriceRecord;
use crate::scraper::{
    price_record, ProviderScraper, ScrapeError, ScrapeSettings, ScrapeStage, StageExt,
};
use async_trait::async_trait;

const PROVIDER: &str = "Pertamina";
const SEARCH_INPUT: &str = "input[placeholder='Cari nama provinsi']";
const ROW_SELECTOR: &str = "table tbody tr";
const HEADER_SELECTOR: &str = "table thead tr";

/// Fuel names of the price columns, used when the table has no header row
pub const PERTAMINA_FUEL_COLUMNS: [&str; 9] = [
    "Pertalite",
    "Pertamax",
    "Pertamax Turbo",
    "Pertamax Green",
    "Biosolar Subsidi",
    "Dexlite",
    "Pertamina Dex",
    "Biosolar Non Subsidi",
    "Pertamax Pertashop",
];

pub struct PertaminaScraper {
    url: String,
    settings: ScrapeSettings,
}

impl PertaminaScraper {
    pub fn new(url: impl Into<String>, settings: ScrapeSettings) -> Self {
        Self {
            url: url.into(),
            settings,
        }
    }
}

/// Picks the fuel name for every price column
///
/// Header labels win when the header has exactly one label per price
/// column (after the province column); otherwise the fixed list is used.
fn fuel_columns(header: Option<&Row>, price_cells: usize) -> Vec<String> {
    if let Some(header) = header {
        let labels: Vec<&String> = header
            .headers
            .iter()
            .chain(header.cells.iter())
            .skip(1)
            .collect();

        if !labels.is_empty()
            && labels.len() == price_cells
            && labels.iter().all(|label| !label.trim().is_empty())
        {
            return labels.into_iter().cloned().collect();
        }

        tracing::debug!(
            "{}: header has {} labels for {} price columns, using fixed columns",
            PROVIDER,
            labels.len(),
            price_cells
        );
    }

    PERTAMINA_FUEL_COLUMNS.iter().map(|s| s.to_string()).collect()
}

#[async_trait]
impl ProviderScraper for PertaminaScraper {
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

        page.wait_for_selector(SEARCH_INPUT, self.settings.content_timeout)
            .await
            .during(PROVIDER, ScrapeStage::WaitForContent)?;

        tracing::debug!("{}: filtering for {}", PROVIDER, self.settings.region);
        page.fill(SEARCH_INPUT, &self.settings.region)
            .await
            .during(PROVIDER, ScrapeStage::FilterRegion)?;
        page.settle(self.settings.settle_delay).await;

        let rows = page
            .extract_rows(ROW_SELECTOR)
            .await
            .during(PROVIDER, ScrapeStage::ExtractRows)?;
        let Some(region_row) = rows.first() else {
            tracing::debug!("{}: no rows after filtering", PROVIDER);
            return Ok(Vec::new());
        };

        let header_rows = page
            .extract_rows(HEADER_SELECTOR)
            .await
            .during(PROVIDER, ScrapeStage::ExtractRows)?;

        let price_cells = region_row.cells.len().saturating_sub(1);
        let columns = fuel_columns(header_rows.first(), price_cells);

        tracing::debug!("{}: {}", PROVIDER, ScrapeStage::ParsePrices);
        let records: Vec<FuelPriceRecord> = columns
            .iter()
            .enumerate()
            .filter_map(|(i, name)| price_record(PROVIDER, name, region_row.cell(i + 1)))
            .collect();

        tracing::debug!("{}: {} ({} prices)", PROVIDER, ScrapeStage::Done, records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{PageError, StaticPage};
    use crate::fuel::FuelType;
    use std::time::Duration;

    const URL: &str = "https://mypertamina.test/about/product-price";

    fn settings() -> ScrapeSettings {
        ScrapeSettings {
            region: "Jawa Timur".to_string(),
            content_timeout: Duration::from_secs(60),
            consent_timeout: Duration::from_secs(8),
            settle_delay: Duration::from_millis(2000),
        }
    }

    const FILTERED_PAGE: &str = r#"<html><body>
        <input placeholder="Cari nama provinsi">
        <table><tbody>
          <tr>
            <td>Jawa Timur</td><td>Rp 10.000</td><td>Rp 12.950</td><td>Rp 14.800</td>
            <td>-</td><td>Rp 6.800</td><td>Rp 13.650</td><td>Rp 14.050</td>
            <td></td><td>Rp 12.700</td>
          </tr>
          <tr><td>Jawa Barat</td><td>Rp 10.100</td></tr>
        </tbody></table>
    </body></html>"#;

    #[tokio::test]
    async fn test_scrape_uses_first_row_and_fixed_columns() {
        let mut page = StaticPage::new().with_document(URL, FILTERED_PAGE);
        let scraper = PertaminaScraper::new(URL, settings());

        let records = scraper.scrape(&mut page).await.unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.fuel_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Pertalite",
                "Pertamax",
                "Pertamax Turbo",
                "Biosolar Subsidi",
                "Dexlite",
                "Pertamina Dex",
                "Pertamax Pertashop",
            ]
        );
        assert_eq!(records[0].price, 10000);
        assert_eq!(records[0].fuel_type, FuelType::Ron90);
        assert_eq!(records[2].fuel_type, FuelType::Ron98);
        assert_eq!(records[3].fuel_type, FuelType::Diesel);
        assert!(records.iter().all(|r| r.provider == "Pertamina"));

        assert_eq!(page.filled(), [(SEARCH_INPUT.to_string(), "Jawa Timur".to_string())]);
    }

    #[tokio::test]
    async fn test_scrape_prefers_header_labels() {
        let html = r#"<html><body>
            <input placeholder="Cari nama provinsi">
            <table>
              <thead><tr><th>Provinsi</th><th>Pertalite</th><th>Pertamax Green 95</th></tr></thead>
              <tbody><tr><td>Jawa Timur</td><td>10.000</td><td>13.900</td></tr></tbody>
            </table>
        </body></html>"#;
        let mut page = StaticPage::new().with_document(URL, html);
        let scraper = PertaminaScraper::new(URL, settings());

        let records = scraper.scrape(&mut page).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].fuel_name, "Pertamax Green 95");
        assert_eq!(records[1].fuel_type, FuelType::Ron95);
        assert_eq!(records[1].price, 13900);
    }

    #[tokio::test]
    async fn test_empty_table_is_not_an_error() {
        let html = r#"<input placeholder="Cari nama provinsi"><table><tbody></tbody></table>"#;
        let mut page = StaticPage::new().with_document(URL, html);
        let scraper = PertaminaScraper::new(URL, settings());

        let records = scraper.scrape(&mut page).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_missing_search_box_fails_waiting() {
        let mut page = StaticPage::new().with_document(URL, "<p>Maintenance</p>");
        let scraper = PertaminaScraper::new(URL, settings());

        let err = scraper.scrape(&mut page).await.unwrap_err();
        assert_eq!(err.stage, ScrapeStage::WaitForContent);
        assert!(matches!(err.source, PageError::Timeout { .. }));
    }

    #[test]
    fn test_fuel_columns_fallback_on_mismatch() {
        let header = Row {
            headers: vec!["Provinsi".to_string(), "Pertalite".to_string()],
            cells: Vec::new(),
        };
        let columns = fuel_columns(Some(&header), 9);
        assert_eq!(columns.len(), 9);
        assert_eq!(columns[8], "Pertamax Pertashop");
    }
}
