//! In-memory page driver backed by canned HTML

use crate::browser::html::{document_has, extract_rows};
use crate::browser::{PageDriver, PageError, PageResult, Row};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// A page driver that serves fixed HTML documents by URL
///
/// Waits resolve immediately: a selector that is absent from the current
/// document times out at once instead of after the requested duration.
/// Every navigation, fill and click is recorded so callers can inspect
/// what a scraper did.
#[derive(Debug, Default)]
pub struct StaticPage {
    documents: HashMap<String, String>,
    current: Option<String>,
    visited: Vec<String>,
    filled: Vec<(String, String)>,
    clicked: Vec<String>,
}

impl StaticPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document served for `url`
    pub fn with_document(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(url, html);
        self
    }

    /// Adds or replaces the document served for `url`
    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.documents.insert(url.into(), html.into());
    }

    /// URLs navigated to, in order
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    /// (selector, text) pairs typed into inputs, in order
    pub fn filled(&self) -> &[(String, String)] {
        &self.filled
    }

    /// Selectors clicked, in order
    pub fn clicked(&self) -> &[String] {
        &self.clicked
    }

    fn current_document(&self) -> PageResult<&str> {
        self.current
            .as_ref()
            .and_then(|url| self.documents.get(url))
            .map(String::as_str)
            .ok_or(PageError::NoDocument)
    }

    fn require_element(&self, selector: &str) -> PageResult<()> {
        if document_has(self.current_document()?, selector)? {
            Ok(())
        } else {
            Err(PageError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
    }
}

#[async_trait]
impl PageDriver for StaticPage {
    async fn navigate(&mut self, url: &str) -> PageResult<()> {
        self.visited.push(url.to_string());

        if !self.documents.contains_key(url) {
            self.current = None;
            return Err(PageError::Navigation {
                url: url.to_string(),
                message: "no document registered for this URL".to_string(),
            });
        }

        self.current = Some(url.to_string());
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> PageResult<()> {
        if document_has(self.current_document()?, selector)? {
            Ok(())
        } else {
            Err(PageError::Timeout {
                selector: selector.to_string(),
                waited: timeout,
            })
        }
    }

    async fn is_visible(&mut self, selector: &str, _timeout: Duration) -> PageResult<bool> {
        document_has(self.current_document()?, selector)
    }

    async fn fill(&mut self, selector: &str, text: &str) -> PageResult<()> {
        self.require_element(selector)?;
        self.filled.push((selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> PageResult<()> {
        self.require_element(selector)?;
        self.clicked.push(selector.to_string());
        Ok(())
    }

    async fn extract_rows(&mut self, selector: &str) -> PageResult<Vec<Row>> {
        extract_rows(self.current_document()?, selector)
    }

    async fn settle(&mut self, _delay: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <input placeholder="Cari nama provinsi">
        <table><tr><td>Pertamax</td><td>12.950</td></tr></table>
    </body></html>"#;

    #[tokio::test]
    async fn test_navigate_and_extract() {
        let mut page = StaticPage::new().with_document("https://example.com/prices", PAGE);

        page.navigate("https://example.com/prices").await.unwrap();
        page.wait_for_selector("table tr", Duration::from_secs(1))
            .await
            .unwrap();

        let rows = page.extract_rows("table tr").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cell(1), "12.950");
        assert_eq!(page.visited(), ["https://example.com/prices"]);
    }

    #[tokio::test]
    async fn test_unknown_url_fails_navigation() {
        let mut page = StaticPage::new();
        let result = page.navigate("https://example.com/missing").await;
        assert!(matches!(result, Err(PageError::Navigation { .. })));

        // Nothing is loaded afterwards
        let rows = page.extract_rows("tr").await;
        assert!(matches!(rows, Err(PageError::NoDocument)));
    }

    #[tokio::test]
    async fn test_missing_selector_times_out() {
        let mut page = StaticPage::new().with_document("https://example.com/", PAGE);
        page.navigate("https://example.com/").await.unwrap();

        let result = page
            .wait_for_selector(".nr-table-component table", Duration::from_secs(60))
            .await;
        match result {
            Err(PageError::Timeout { selector, waited }) => {
                assert_eq!(selector, ".nr-table-component table");
                assert_eq!(waited, Duration::from_secs(60));
            }
            other => panic!("expected timeout, got {:?}", other),
        }

        assert!(!page
            .is_visible("button.accept", Duration::from_secs(1))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_fill_records_input() {
        let mut page = StaticPage::new().with_document("https://example.com/", PAGE);
        page.navigate("https://example.com/").await.unwrap();

        page.fill("input[placeholder='Cari nama provinsi']", "Jawa Timur")
            .await
            .unwrap();
        assert_eq!(page.filled()[0].1, "Jawa Timur");

        let result = page.click("button.missing").await;
        assert!(matches!(result, Err(PageError::ElementNotFound { .. })));
        assert!(page.clicked().is_empty());
    }
}
