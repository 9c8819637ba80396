//! Local file catalog source

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::error::CatalogError;
use crate::catalog::source::CatalogSource;

pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl CatalogSource for FileCatalogSource {
    fn source_key(&self) -> String {
        format!("file://{}", self.path.display())
    }

    async fn fetch_document(&self) -> Result<String, CatalogError> {
        debug!("Reading catalog from {:?}", self.path);
        match tokio::fs::read_to_string(&self.path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CatalogError::NotFound(self.path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn fetch_document_reads_file_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        std::fs::write(&path, r#"{"products": []}"#).unwrap();

        let source = FileCatalogSource::new(&path);

        assert_eq!(source.fetch_document().await.unwrap(), r#"{"products": []}"#);
    }

    #[tokio::test]
    async fn fetch_document_returns_not_found_for_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = FileCatalogSource::new(temp_dir.path().join("missing.json"));

        assert!(matches!(
            source.fetch_document().await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn source_key_includes_path() {
        let source = FileCatalogSource::new("/tmp/catalog.json");
        assert_eq!(source.source_key(), "file:///tmp/catalog.json");
    }
}
