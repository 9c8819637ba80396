//! Source trait for fetching catalog documents

#[cfg(test)]
use mockall::automock;

use crate::catalog::error::CatalogError;

/// Trait for fetching the raw catalog document
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Stable identifier of this source, used as the cache key
    fn source_key(&self) -> String;

    /// Fetches the catalog document as text
    ///
    /// # Returns
    /// * `Ok(String)` - The document body
    /// * `Err(CatalogError)` - If the fetch fails
    async fn fetch_document(&self) -> Result<String, CatalogError>;
}
