use crate::config::types::{BrowserConfig, Config, OutputConfig, ScraperConfig, SourcesConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_browser_config(&config.browser)?;
    validate_output_config(&config.output)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.region.trim().is_empty() {
        return Err(ConfigError::Validation("region cannot be empty".to_string()));
    }

    if config.content_timeout_secs < 1 || config.content_timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "content-timeout-secs must be between 1 and 600, got {}",
            config.content_timeout_secs
        )));
    }

    if config.consent_timeout_secs > 120 {
        return Err(ConfigError::Validation(format!(
            "consent-timeout-secs must be <= 120, got {}",
            config.consent_timeout_secs
        )));
    }

    if config.settle_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "settle-delay-ms must be <= 60000, got {}",
            config.settle_delay_ms
        )));
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.navigation_timeout_secs < 1 || config.navigation_timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-secs must be between 1 and 600, got {}",
            config.navigation_timeout_secs
        )));
    }

    if let Some(remote_url) = &config.remote_url {
        let url = Url::parse(remote_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid remote-url: {}", e)))?;

        if !matches!(url.scheme(), "ws" | "wss" | "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "remote-url '{}' must use ws, wss, http or https",
                remote_url
            )));
        }
    }

    if let Some(path) = &config.chrome_executable {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "chrome-executable cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates provider page URLs
fn validate_sources(sources: &SourcesConfig) -> Result<(), ConfigError> {
    for (key, value) in [
        ("pertamina-url", &sources.pertamina_url),
        ("shell-url", &sources.shell_url),
        ("bp-url", &sources.bp_url),
    ] {
        validate_page_url(key, value)?;
    }
    Ok(())
}

/// Validates that a provider page URL is absolute http(s)
fn validate_page_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            key, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_page_url() {
        assert!(validate_page_url("shell-url", "https://www.shell.co.id/").is_ok());
        assert!(validate_page_url("shell-url", "http://localhost:8080/prices").is_ok());

        assert!(matches!(
            validate_page_url("shell-url", "not a url"),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_page_url("shell-url", "ftp://example.com/prices"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_scraper_bounds() {
        let mut config = ScraperConfig::default();
        assert!(validate_scraper_config(&config).is_ok());

        config.content_timeout_secs = 0;
        assert!(validate_scraper_config(&config).is_err());

        config = ScraperConfig::default();
        config.settle_delay_ms = 120_000;
        assert!(validate_scraper_config(&config).is_err());

        config = ScraperConfig::default();
        config.region = String::new();
        assert!(validate_scraper_config(&config).is_err());
    }

    #[test]
    fn test_validate_remote_url() {
        let mut config = BrowserConfig::default();
        config.remote_url = Some("ws://localhost:9222".to_string());
        assert!(validate_browser_config(&config).is_ok());

        config.remote_url = Some("file:///tmp/chrome".to_string());
        assert!(validate_browser_config(&config).is_err());

        config.remote_url = Some("localhost:9222 with spaces".to_string());
        assert!(validate_browser_config(&config).is_err());
    }
}
