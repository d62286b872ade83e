use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use fuel_scout::config::load_config;
///
/// let config = load_config(Path::new("fuel-scout.toml")).unwrap();
/// println!("Database: {}", config.output.database_path);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Each scrape run records this hash, so a change in configuration between
/// runs can be traced back from the database.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::DEFAULT_SHELL_URL;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let config_content = r#"
[scraper]
region = "Jawa Barat"
content-timeout-secs = 30
consent-timeout-secs = 5
settle-delay-ms = 500

[browser]
headless = false
chrome-executable = "/usr/bin/chromium"
chrome-args = ["--lang=id-ID"]
navigation-timeout-secs = 45

[output]
database-path = "./fuel.db"

[sources]
bp-url = "https://www.bp.com/id_id/indonesia/harga.html"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scraper.region, "Jawa Barat");
        assert_eq!(config.scraper.settle_delay_ms, 500);
        assert!(!config.browser.headless);
        assert_eq!(config.browser.chrome_args, vec!["--lang=id-ID"]);
        assert_eq!(config.output.database_path, "./fuel.db");
        assert_eq!(
            config.sources.bp_url,
            "https://www.bp.com/id_id/indonesia/harga.html"
        );
        assert_eq!(config.sources.shell_url, DEFAULT_SHELL_URL);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("[output]\ndatabase-path = \"fuel.db\"\n").unwrap();

        assert_eq!(config.scraper.region, "Jawa Timur");
        assert_eq!(config.scraper.content_timeout_secs, 60);
        assert_eq!(config.scraper.consent_timeout_secs, 8);
        assert_eq!(config.scraper.settle_delay_ms, 2000);
        assert!(config.browser.headless);
        assert!(config.browser.remote_url.is_none());
    }

    #[test]
    fn test_missing_output_section() {
        let result = parse_config("[scraper]\nregion = \"Bali\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/fuel-scout.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[scraper]
region = "   "

[output]
database-path = "./fuel.db"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("[output]\ndatabase-path = \"a.db\"\n");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);

        let other = create_temp_config("[output]\ndatabase-path = \"b.db\"\n");
        assert_ne!(hash1, compute_config_hash(other.path()).unwrap());
    }
}
