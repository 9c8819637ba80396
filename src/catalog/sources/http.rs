//! HTTP catalog source

use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::error::CatalogError;
use crate::catalog::source::CatalogSource;
use crate::config::FETCH_TIMEOUT_MS;

/// Fetches the catalog document from a URL
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: &str) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("update-resolver/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpCatalogSource {
    fn source_key(&self) -> String {
        self.url.clone()
    }

    async fn fetch_document(&self) -> Result<String, CatalogError> {
        debug!("Fetching catalog from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(self.url.clone()));
        }

        if !status.is_success() {
            warn!("Catalog server returned status {}: {}", status, self.url);
            return Err(CatalogError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn fetch_document_returns_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/updates.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"products": []}"#)
            .create_async()
            .await;

        let source = HttpCatalogSource::new(&format!("{}/updates.json", server.url())).unwrap();
        let body = source.fetch_document().await.unwrap();

        mock.assert_async().await;
        assert_eq!(body, r#"{"products": []}"#);
    }

    #[tokio::test]
    async fn fetch_document_returns_not_found_for_missing_catalog() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/updates.json")
            .with_status(404)
            .create_async()
            .await;

        let source = HttpCatalogSource::new(&format!("{}/updates.json", server.url())).unwrap();
        let result = source.fetch_document().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_document_returns_invalid_response_for_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/updates.json")
            .with_status(503)
            .create_async()
            .await;

        let source = HttpCatalogSource::new(&format!("{}/updates.json", server.url())).unwrap();
        let result = source.fetch_document().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(CatalogError::InvalidResponse(_))));
    }
}
