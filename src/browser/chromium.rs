//! Headless Chrome page driver over the DevTools protocol

use crate::browser::html::extract_rows;
use crate::browser::remote::resolve_websocket_url;
use crate::browser::{PageDriver, PageError, PageResult, Row};
use crate::config::BrowserConfig;
use crate::FuelError;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig as CdpConfig, Page};
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Interval between DOM polls while waiting for a selector
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A running (or connected) Chrome instance
///
/// Exactly one session is opened per scrape run and it must be released
/// with `close`.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
    remote: bool,
}

impl BrowserSession {
    /// Launches a local Chrome, or connects to `remote-url` when configured
    ///
    /// # Returns
    ///
    /// * `Ok(BrowserSession)` - Browser is ready for new pages
    /// * `Err(FuelError::Browser)` - Chrome could not be found or started
    pub async fn launch(config: &BrowserConfig) -> Result<Self, FuelError> {
        let navigation_timeout = config.navigation_timeout();

        let (browser, mut handler, remote) = match &config.remote_url {
            Some(remote_url) => {
                let client = reqwest::Client::builder()
                    .timeout(navigation_timeout)
                    .build()?;
                let ws_url = resolve_websocket_url(&client, remote_url).await?;
                tracing::info!("Connecting to remote browser at {}", ws_url);

                let (browser, handler) = Browser::connect(ws_url).await.map_err(|e| {
                    FuelError::Browser(format!("Failed to connect to remote browser: {}", e))
                })?;
                (browser, handler, true)
            }
            None => {
                tracing::info!("Launching browser (headless={})", config.headless);

                let (browser, handler) = Browser::launch(build_launch_config(config)?)
                    .await
                    .map_err(|e| FuelError::Browser(format!("Failed to launch browser: {}", e)))?;
                (browser, handler, false)
            }
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler stopped: {}", e);
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            navigation_timeout,
            remote,
        })
    }

    /// Opens a blank tab
    pub async fn new_page(&self) -> Result<ChromiumPage, FuelError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| FuelError::Browser(format!("Failed to open page: {}", e)))?;

        Ok(ChromiumPage {
            page,
            navigation_timeout: self.navigation_timeout,
        })
    }

    /// Shuts the browser down
    ///
    /// A remote browser is only disconnected from, never closed. Errors are
    /// logged, not returned.
    pub async fn close(mut self) {
        if !self.remote {
            if let Err(e) = self.browser.close().await {
                tracing::warn!("Failed to close browser cleanly: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                tracing::warn!("Failed to reap browser process: {}", e);
            }
        }

        self.handler.abort();
        tracing::debug!("Browser session closed");
    }
}

fn build_launch_config(config: &BrowserConfig) -> Result<CdpConfig, FuelError> {
    let mut builder = CdpConfig::builder();

    if let Some(path) = &config.chrome_executable {
        builder = builder.chrome_executable(path);
    }

    // with_head means NOT headless
    if !config.headless {
        builder = builder.with_head();
    }

    builder = builder
        .arg("--no-sandbox")
        .arg("--disable-gpu")
        .arg("--disable-dev-shm-usage")
        .arg("--no-first-run")
        .arg("--no-default-browser-check");

    for arg in &config.chrome_args {
        builder = builder.arg(arg.as_str());
    }

    builder
        .build()
        .map_err(|e| FuelError::Browser(format!("Failed to build browser config: {}", e)))
}

/// A Chrome tab driven through CDP
pub struct ChromiumPage {
    page: Page,
    navigation_timeout: Duration,
}

impl ChromiumPage {
    /// Closes the tab
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            tracing::debug!("Failed to close page: {}", e);
        }
    }

    async fn element_visible(&self, selector: &str) -> PageResult<bool> {
        let result = self
            .page
            .evaluate(visibility_script(selector))
            .await
            .map_err(|e| PageError::Protocol(e.to_string()))?;

        result
            .into_value::<bool>()
            .map_err(|e| PageError::Protocol(e.to_string()))
    }
}

/// Builds a JS expression that reports whether `selector` is rendered
fn visibility_script(selector: &str) -> String {
    let quoted = serde_json::Value::String(selector.to_string()).to_string();
    format!(
        r#"(() => {{
            const el = document.querySelector({quoted});
            if (!el) return false;
            const rect = el.getBoundingClientRect();
            const style = window.getComputedStyle(el);
            return rect.width > 0 && rect.height > 0
                && style.visibility !== 'hidden' && style.display !== 'none';
        }})()"#
    )
}

#[async_trait]
impl PageDriver for ChromiumPage {
    async fn navigate(&mut self, url: &str) -> PageResult<()> {
        tracing::debug!("Navigating to {}", url);

        tokio::time::timeout(self.navigation_timeout, self.page.goto(url))
            .await
            .map_err(|_| PageError::Navigation {
                url: url.to_string(),
                message: format!("timed out after {:?}", self.navigation_timeout),
            })?
            .map_err(|e| PageError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> PageResult<()> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(PageError::Timeout {
                    selector: selector.to_string(),
                    waited: timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn is_visible(&mut self, selector: &str, timeout: Duration) -> PageResult<bool> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.element_visible(selector).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn fill(&mut self, selector: &str, text: &str) -> PageResult<()> {
        let element =
            self.page
                .find_element(selector)
                .await
                .map_err(|_| PageError::ElementNotFound {
                    selector: selector.to_string(),
                })?;

        element
            .click()
            .await
            .map_err(|e| PageError::Protocol(e.to_string()))?;
        element
            .type_str(text)
            .await
            .map_err(|e| PageError::Protocol(e.to_string()))?;

        Ok(())
    }

    async fn click(&mut self, selector: &str) -> PageResult<()> {
        let element =
            self.page
                .find_element(selector)
                .await
                .map_err(|_| PageError::ElementNotFound {
                    selector: selector.to_string(),
                })?;

        element
            .click()
            .await
            .map_err(|e| PageError::Protocol(e.to_string()))?;

        Ok(())
    }

    async fn extract_rows(&mut self, selector: &str) -> PageResult<Vec<Row>> {
        let html = self
            .page
            .content()
            .await
            .map_err(|e| PageError::Protocol(e.to_string()))?;

        extract_rows(&html, selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_script_quotes_selector() {
        let script = visibility_script("input[placeholder='Cari nama provinsi']");
        assert!(script.contains(r#"document.querySelector("input[placeholder='Cari nama provinsi']")"#));
    }
}
