//! Row extraction from HTML snapshots

use crate::browser::{PageError, PageResult, Row};
use scraper::{ElementRef, Html, Selector};

/// Extracts the text of every row matched by `selector`
///
/// # Arguments
///
/// * `html` - Full HTML document
/// * `selector` - CSS selector for the rows (e.g. `table tbody tr`)
///
/// # Returns
///
/// * `Ok(Vec<Row>)` - One entry per matched element, in document order
/// * `Err(PageError::InvalidSelector)` - The selector does not parse
///
/// # Example
///
/// ```
/// use fuel_scout::browser::extract_rows;
///
/// let html = "<table><tr><th>Pertalite</th><td>10.000</td></tr></table>";
/// let rows = extract_rows(html, "table tr").unwrap();
/// assert_eq!(rows[0].header(0), "Pertalite");
/// assert_eq!(rows[0].cell(0), "10.000");
/// ```
pub fn extract_rows(html: &str, selector: &str) -> PageResult<Vec<Row>> {
    let document = Html::parse_document(html);
    let row_selector = parse_selector(selector)?;
    let header_selector = parse_selector("th")?;
    let cell_selector = parse_selector("td")?;

    let rows = document
        .select(&row_selector)
        .map(|row| Row {
            headers: row.select(&header_selector).map(element_text).collect(),
            cells: row.select(&cell_selector).map(element_text).collect(),
        })
        .collect();

    Ok(rows)
}

/// Returns true if `selector` matches at least one element in `html`
pub fn document_has(html: &str, selector: &str) -> PageResult<bool> {
    let document = Html::parse_document(html);
    let selector = parse_selector(selector)?;
    let found = document.select(&selector).next().is_some();
    Ok(found)
}

fn parse_selector(selector: &str) -> PageResult<Selector> {
    Selector::parse(selector).map_err(|e| PageError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Collapses the element's text nodes the way rendered inner text reads
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
        <html><body>
        <table>
          <thead><tr><th>Produk</th><th>Jawa Barat</th><th>Jawa Timur</th></tr></thead>
          <tbody>
            <tr><th> BP
                 Ultimate </th><td>Rp 13.500</td><td>Rp 13.600</td></tr>
            <tr><th>BP 92</th><td>12.700</td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_extract_rows_splits_headers_and_cells() {
        let rows = extract_rows(TABLE, "table tbody tr").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].headers, vec!["BP Ultimate"]);
        assert_eq!(rows[0].cells, vec!["Rp 13.500", "Rp 13.600"]);
        assert_eq!(rows[1].cell(1), "");
    }

    #[test]
    fn test_extract_header_row() {
        let rows = extract_rows(TABLE, "table thead tr").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].headers, vec!["Produk", "Jawa Barat", "Jawa Timur"]);
        assert!(rows[0].cells.is_empty());
    }

    #[test]
    fn test_no_matches_is_empty() {
        let rows = extract_rows("<p>closed for maintenance</p>", "table tr").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_invalid_selector() {
        let result = extract_rows(TABLE, "table[[");
        assert!(matches!(result, Err(PageError::InvalidSelector { .. })));
    }

    #[test]
    fn test_document_has() {
        assert!(document_has(TABLE, "table tbody tr").unwrap());
        assert!(!document_has(TABLE, "button.nr-cookie-accept").unwrap());
    }
}
