//! Browser automation layer
//!
//! Scrapers never talk to Chrome directly. They drive a `PageDriver`, a small
//! page-automation capability with navigation, bounded waits, form input and
//! row extraction. Two implementations ship with the crate:
//! - `ChromiumPage`: a real headless Chrome tab over CDP (`browser` feature)
//! - `StaticPage`: canned HTML keyed by URL, for tests and offline fixtures
//!
//! Both extract rows from an HTML snapshot through the same parser in `html`.

#[cfg(feature = "browser")]
mod chromium;
mod html;
mod remote;
mod static_page;

#[cfg(feature = "browser")]
pub use chromium::{BrowserSession, ChromiumPage};
pub use html::{document_has, extract_rows};
pub use remote::resolve_websocket_url;
pub use static_page::StaticPage;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a page driver
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {waited:?} waiting for '{selector}'")]
    Timeout { selector: String, waited: Duration },

    #[error("Element '{selector}' not found")]
    ElementNotFound { selector: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("No document loaded")]
    NoDocument,

    #[error("Browser protocol error: {0}")]
    Protocol(String),
}

/// Result type for page operations
pub type PageResult<T> = Result<T, PageError>;

/// Text content of one table row
///
/// `headers` holds the row's `<th>` cells and `cells` its `<td>` cells, each
/// in document order with whitespace collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub headers: Vec<String>,
    pub cells: Vec<String>,
}

impl Row {
    /// Returns the header cell at `index`, or "" when the row is shorter
    pub fn header(&self, index: usize) -> &str {
        self.headers.get(index).map(String::as_str).unwrap_or("")
    }

    /// Returns the data cell at `index`, or "" when the row is shorter
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Page-automation capability used by the provider scrapers
#[async_trait]
pub trait PageDriver: Send {
    /// Loads `url` in the page
    async fn navigate(&mut self, url: &str) -> PageResult<()>;

    /// Waits until `selector` matches an element, failing after `timeout`
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> PageResult<()>;

    /// Returns whether `selector` becomes visible within `timeout`
    ///
    /// Not finding the element in time is `Ok(false)`, not an error.
    async fn is_visible(&mut self, selector: &str, timeout: Duration) -> PageResult<bool>;

    /// Types `text` into the input matched by `selector`
    async fn fill(&mut self, selector: &str, text: &str) -> PageResult<()>;

    /// Clicks the element matched by `selector`
    async fn click(&mut self, selector: &str) -> PageResult<()>;

    /// Reads every row matched by `selector` from the current document
    async fn extract_rows(&mut self, selector: &str) -> PageResult<Vec<Row>>;

    /// Pauses for a fixed delay so the page can react to input
    async fn settle(&mut self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
