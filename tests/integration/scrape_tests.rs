//! Integration tests for the scrape pipeline
//!
//! These tests drive the real provider scrapers and orchestrator against
//! canned provider pages served by `StaticPage`, persisting into a SQLite
//! file in a temporary directory.

use fuel_scout::browser::StaticPage;
use fuel_scout::config::{
    load_config_with_hash, BrowserConfig, Config, OutputConfig, ScraperConfig, SourcesConfig,
};
use fuel_scout::scraper::Orchestrator;
use fuel_scout::storage::{RunStatus, ScrapeStatus, SqliteStorage, Storage};
use fuel_scout::{FuelPriceRecord, FuelType};
use std::path::Path;

const PERTAMINA_URL: &str = "https://pertamina.test/about/product-price";
const SHELL_URL: &str = "https://shell.test/how-shell-price-fuel.html";
const BP_URL: &str = "https://bp.test/spbu/harga.html";

const PERTAMINA_PAGE: &str = r#"<html><body>
    <input placeholder="Cari nama provinsi">
    <table><tbody>
      <tr>
        <td>Jawa Timur</td><td>Rp 10.000</td><td>Rp 12.950</td><td>Rp 14.800</td>
        <td>Rp 13.900</td><td>Rp 6.800</td><td>Rp 13.650</td><td>Rp 14.050</td>
        <td>Rp 12.200</td><td>Rp 12.700</td>
      </tr>
    </tbody></table>
</body></html>"#;

const SHELL_PAGE: &str = r#"<html><body><table>
    <tr><th>Produk</th><th>Lokasi</th><th>Harga</th></tr>
    <tr><td>Shell Super</td><td>Jawa Timur</td><td>Rp 13.590</td></tr>
    <tr><td>Shell V-Power</td><td>Jawa Timur</td><td>Rp 14.250</td></tr>
    <tr><td>Shell V-Power Diesel</td><td>Jawa Timur</td><td>Rp 14.230</td></tr>
    <tr><td>Shell Super</td><td>Jawa Barat</td><td>Rp 13.500</td></tr>
</table></body></html>"#;

const BP_PAGE: &str = r#"<html><body>
    <button class="nr-cookie-accept">Terima</button>
    <div class="nr-table-component"><table><tbody>
      <tr><th>Produk</th><td>Jabodetabek</td><td>Jawa Timur</td></tr>
      <tr><th>BP Ultimate</th><td>Rp 13.500</td><td>Rp 13.600</td></tr>
      <tr><th>BP 92</th><td>Rp 12.700</td><td>Rp 12.800</td></tr>
    </tbody></table></div>
</body></html>"#;

/// Creates a test configuration pointing at the canned provider pages
fn create_test_config(db_path: &Path) -> Config {
    Config {
        scraper: ScraperConfig {
            region: "Jawa Timur".to_string(),
            content_timeout_secs: 1,
            consent_timeout_secs: 1,
            settle_delay_ms: 0,
        },
        browser: BrowserConfig::default(),
        output: OutputConfig {
            database_path: db_path.to_string_lossy().into_owned(),
        },
        sources: SourcesConfig {
            pertamina_url: PERTAMINA_URL.to_string(),
            shell_url: SHELL_URL.to_string(),
            bp_url: BP_URL.to_string(),
        },
    }
}

fn all_pages() -> StaticPage {
    StaticPage::new()
        .with_document(PERTAMINA_URL, PERTAMINA_PAGE)
        .with_document(SHELL_URL, SHELL_PAGE)
        .with_document(BP_URL, BP_PAGE)
}

#[tokio::test]
async fn test_full_scrape_all_providers() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&dir.path().join("fuel.db"));
    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    let mut page = all_pages();

    let report = Orchestrator::from_config(&config, "hash-1")
        .run(&mut page, &mut storage)
        .await;

    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.prices.len(), 9 + 3 + 2);
    assert_eq!(report.persisted, Some(14));
    assert_eq!(page.visited(), [PERTAMINA_URL, SHELL_URL, BP_URL]);

    assert_eq!(storage.count_prices().unwrap(), 14);
    let run = storage.get_run(report.run_id.unwrap()).unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "hash-1");

    let providers: Vec<String> = storage
        .list_providers()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(providers, vec!["BP", "Pertamina", "Shell"]);
}

#[tokio::test]
async fn test_provider_failure_does_not_stop_others() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&dir.path().join("fuel.db"));
    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();

    // Pertamina's page is unreachable
    let mut page = StaticPage::new()
        .with_document(SHELL_URL, SHELL_PAGE)
        .with_document(BP_URL, BP_PAGE);

    let report = Orchestrator::from_config(&config, "hash")
        .run(&mut page, &mut storage)
        .await;

    assert!(report.prices.iter().all(|p| p.provider != "Pertamina"));
    assert_eq!(report.prices.len(), 5);

    let logs = storage
        .scrape_logs_for_run(report.run_id.unwrap())
        .unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(
        logs.iter()
            .filter(|l| l.status == ScrapeStatus::Failed)
            .count(),
        1
    );
    assert_eq!(logs[0].provider, "Pertamina");
    assert_eq!(logs[0].status, ScrapeStatus::Failed);
    assert!(logs[0]
        .message
        .as_deref()
        .unwrap()
        .contains("failed during navigate"));
}

#[tokio::test]
async fn test_shell_region_filter_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&dir.path().join("fuel.db"));
    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();

    let shell_page = r#"<table>
        <tr><td>Produk</td><td>Lokasi</td><td>Harga</td></tr>
        <tr><td>Pertamax Turbo</td><td>Jawa Timur</td><td>14.800</td></tr>
        <tr><td>Pertalite</td><td>Jawa Barat</td><td>10.000</td></tr>
    </table>"#;
    let mut page = StaticPage::new().with_document(SHELL_URL, shell_page);

    let report = Orchestrator::from_config(&config, "hash")
        .run(&mut page, &mut storage)
        .await;

    assert_eq!(
        report.prices,
        vec![FuelPriceRecord::new(
            "Shell",
            "Pertamax Turbo",
            FuelType::Ron98,
            14800
        )]
    );
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 2);
}

#[tokio::test]
async fn test_repeated_runs_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&dir.path().join("fuel.db"));
    let orchestrator = Orchestrator::from_config(&config, "hash");

    let first_run = {
        let mut storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
        let mut page = all_pages();
        orchestrator.run(&mut page, &mut storage).await.run_id.unwrap()
    };

    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    let mut page = all_pages();
    let second_run = orchestrator.run(&mut page, &mut storage).await.run_id.unwrap();

    assert_ne!(first_run, second_run);
    assert_eq!(storage.count_prices().unwrap(), 14);
    assert_eq!(storage.recent_scrape_logs(100).unwrap().len(), 6);
    assert_eq!(
        storage.get_latest_run().unwrap().unwrap().id,
        second_run
    );
}

#[tokio::test]
async fn test_config_file_drives_orchestrator() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("fuel-scout.toml");
    let db_path = dir.path().join("fuel.db");

    std::fs::write(
        &config_path,
        format!(
            r#"
[scraper]
region = "Jawa Timur"
settle-delay-ms = 0

[output]
database-path = "{}"

[sources]
pertamina-url = "{}"
shell-url = "{}"
bp-url = "{}"
"#,
            db_path.to_string_lossy().replace('\\', "/"),
            PERTAMINA_URL,
            SHELL_URL,
            BP_URL
        ),
    )
    .unwrap();

    let (config, hash) = load_config_with_hash(&config_path).unwrap();
    assert_eq!(hash.len(), 64);

    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    let mut page = all_pages();
    let report = Orchestrator::from_config(&config, hash.clone())
        .run(&mut page, &mut storage)
        .await;

    assert_eq!(report.succeeded(), 3);
    let run = storage.get_run(report.run_id.unwrap()).unwrap();
    assert_eq!(run.config_hash, hash);
}
