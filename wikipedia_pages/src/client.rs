//! HTTP client for Wikipedia article pages.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::{source::PageSource, user_agent::get_user_agent, Error};

/// HTTP client that fetches raw article markup.
///
/// Holds a single `reqwest::Client` with a 30-second timeout. The client
/// does not retry; retry policy belongs to whoever wraps it.
pub struct Client {
    /// Base URL for article paths. Defaults to `https://en.wikipedia.org`.
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a new client pointing at English Wikipedia.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url("https://en.wikipedia.org")
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Returns the base URL every address is joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_url(&self, address: &str) -> Result<Url, Error> {
        let joined = if address.starts_with('/') {
            format!("{}{}", self.base_url, address)
        } else {
            format!("{}/{}", self.base_url, address)
        };
        Url::parse(&joined).map_err(|e| {
            tracing::error!("Invalid URL constructed from {}: {}", address, e);
            Error::InvalidAddress(address.to_string())
        })
    }

    /// Fetches the raw markup at `address`.
    pub async fn get_page(&self, address: &str) -> Result<String, Error> {
        let url = self.get_url(address)?;
        let resp = self
            .http
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {}: {}", address, e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read body of {}: {}", address, e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("{} returned status {}: {}", address, status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        tracing::debug!("fetched {} ({} bytes)", address, body.len());
        Ok(body)
    }
}

#[async_trait]
impl PageSource for Client {
    async fn fetch(&self, address: &str) -> Result<String, Error> {
        self.get_page(address).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_absolute_paths_onto_base() {
        let client = Client::with_base_url("https://example.org/").unwrap();
        let url = client.get_url("/wiki/Wings_(1927_film)").unwrap();
        assert_eq!(url.as_str(), "https://example.org/wiki/Wings_(1927_film)");
    }

    #[test]
    fn joins_relative_paths_with_separator() {
        let client = Client::with_base_url("https://example.org").unwrap();
        let url = client.get_url("wiki/Hamlet").unwrap();
        assert_eq!(url.as_str(), "https://example.org/wiki/Hamlet");
    }

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "£".repeat(1500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
    }
}
