use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Region scraped when none is configured
pub const DEFAULT_REGION: &str = "Jawa Timur";

pub const DEFAULT_PERTAMINA_URL: &str = "https://mypertamina.id/about/product-price";
pub const DEFAULT_SHELL_URL: &str =
    "https://www.shell.co.id/in_id/pengendara-bermotor/bahan-bakar-shell/how-shell-price-fuel.html";
pub const DEFAULT_BP_URL: &str =
    "https://www.bp.com/id_id/indonesia/home/produk-dan-layanan/spbu/harga.html";

/// Main configuration structure for Fuel-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScraperConfig {
    /// Region whose prices are kept (e.g. "Jawa Timur")
    #[serde(default = "default_region")]
    pub region: String,

    /// How long to wait for a provider's price table (seconds)
    #[serde(default = "default_content_timeout")]
    pub content_timeout_secs: u64,

    /// How long to look for a cookie consent button (seconds)
    #[serde(default = "default_consent_timeout")]
    pub consent_timeout_secs: u64,

    /// Pause after typing or clicking, so the page can re-render (milliseconds)
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
}

impl ScraperConfig {
    pub fn content_timeout(&self) -> Duration {
        Duration::from_secs(self.content_timeout_secs)
    }

    pub fn consent_timeout(&self) -> Duration {
        Duration::from_secs(self.consent_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            content_timeout_secs: default_content_timeout(),
            consent_timeout_secs: default_consent_timeout(),
            settle_delay_ms: default_settle_delay(),
        }
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BrowserConfig {
    /// Run Chrome without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    /// Extra command-line arguments passed to Chrome
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// DevTools endpoint of an already running browser (e.g. "ws://localhost:9222")
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Page load timeout (seconds)
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_executable: None,
            chrome_args: Vec::new(),
            remote_url: None,
            navigation_timeout_secs: default_navigation_timeout(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

/// Provider price page locations
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourcesConfig {
    #[serde(default = "default_pertamina_url")]
    pub pertamina_url: String,

    #[serde(default = "default_shell_url")]
    pub shell_url: String,

    #[serde(default = "default_bp_url")]
    pub bp_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            pertamina_url: default_pertamina_url(),
            shell_url: default_shell_url(),
            bp_url: default_bp_url(),
        }
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_content_timeout() -> u64 {
    60
}

fn default_consent_timeout() -> u64 {
    8
}

fn default_settle_delay() -> u64 {
    2000
}

fn default_headless() -> bool {
    true
}

fn default_navigation_timeout() -> u64 {
    60
}

fn default_pertamina_url() -> String {
    DEFAULT_PERTAMINA_URL.to_string()
}

fn default_shell_url() -> String {
    DEFAULT_SHELL_URL.to_string()
}

fn default_bp_url() -> String {
    DEFAULT_BP_URL.to_string()
}
