//! Shared HTTP clients
//!
//! Three clients cover every source: JSON APIs (Spotify, Last.fm), MusicBrainz
//! (descriptive User-Agent, longer deadline) and HTML pages (browser
//! User-Agent).

use crate::types::LookupFailure;
use genrefill_common::config::HttpConfig;
use genrefill_common::{Error, Result};
use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";
const ACCEPT_JSON: &str = "application/json";

/// HTTP clients shared by all sources
#[derive(Debug, Clone)]
pub struct HttpClients {
    /// Spotify and Last.fm
    pub api: Client,
    /// MusicBrainz web service
    pub musicbrainz: Client,
    /// Scraped HTML pages
    pub browser: Client,
}

impl HttpClients {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let api = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let mut mb_headers = header::HeaderMap::new();
        mb_headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_JSON));
        let musicbrainz = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.musicbrainz_timeout_secs))
            .default_headers(mb_headers)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create MusicBrainz client: {}", e)))?;

        let mut html_headers = header::HeaderMap::new();
        html_headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_HTML));
        let browser = Client::builder()
            .user_agent(config.browser_user_agent.as_str())
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .default_headers(html_headers)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create scraping client: {}", e)))?;

        Ok(Self {
            api,
            musicbrainz,
            browser,
        })
    }
}

/// Send a request and decode a JSON body
pub async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> std::result::Result<T, LookupFailure> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        debug!(status = status.as_u16(), url = %response.url(), "Non-success response");
        return Err(LookupFailure::Status(status.as_u16()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| LookupFailure::Parse(e.to_string()))
}

/// Send a request and return the body as text
pub async fn fetch_text(request: RequestBuilder) -> std::result::Result<String, LookupFailure> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        debug!(status = status.as_u16(), url = %response.url(), "Non-success response");
        return Err(LookupFailure::Status(status.as_u16()));
    }

    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clients_build_from_defaults() {
        let clients = HttpClients::new(&HttpConfig::default());
        assert!(clients.is_ok());
    }
}
