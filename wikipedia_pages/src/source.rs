//! The page-source seam shared by every extraction step.

use async_trait::async_trait;

use crate::Error;

/// Anything that can turn a site-relative address into raw page text.
///
/// The HTTP [`Client`](crate::Client) is the production implementation;
/// the library wraps it with caching and retries, and tests substitute
/// in-memory sources.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the raw markup found at `address` (e.g. `/wiki/Wings_(1927_film)`).
    async fn fetch(&self, address: &str) -> Result<String, Error>;
}

