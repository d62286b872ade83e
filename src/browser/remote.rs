//! Discovery of remote Chrome DevTools endpoints

use crate::FuelError;
use reqwest::Client;

/// Resolves a configured remote browser address to its DevTools WebSocket URL
///
/// A full `ws://…/devtools/browser/<id>` address is returned unchanged. Any
/// other address (`ws://host:9222`, `http://host:9222`) is queried at
/// `/json/version` for its `webSocketDebuggerUrl`.
///
/// # Arguments
///
/// * `client` - HTTP client used for the version query
/// * `remote_url` - The configured remote browser address
///
/// # Returns
///
/// * `Ok(String)` - WebSocket URL to connect to
/// * `Err(FuelError)` - The endpoint could not be reached or gave no URL
pub async fn resolve_websocket_url(client: &Client, remote_url: &str) -> Result<String, FuelError> {
    let is_ws = remote_url.starts_with("ws://") || remote_url.starts_with("wss://");
    if is_ws && remote_url.contains("/devtools/") {
        return Ok(remote_url.to_string());
    }

    let http_url = remote_url
        .replacen("wss://", "https://", 1)
        .replacen("ws://", "http://", 1);
    let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

    tracing::debug!("Querying DevTools version endpoint: {}", version_url);

    let response = client.get(&version_url).send().await?.error_for_status()?;
    let info: serde_json::Value = response.json().await?;

    info.get("webSocketDebuggerUrl")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| FuelError::RemoteBrowser {
            url: version_url,
            message: "response has no webSocketDebuggerUrl".to_string(),
        })
}
