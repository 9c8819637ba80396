//! Cache-aware catalog loading
//!
//! Order of preference:
//! - a cached document younger than the refresh interval (unless forced)
//! - a freshly fetched document, which then replaces the cached one
//! - a stale cached document, when fetching or parsing fails

use tracing::{debug, info, warn};

use crate::catalog::cache::DocumentStorer;
use crate::catalog::error::CatalogError;
use crate::catalog::model::Catalog;
use crate::catalog::source::CatalogSource;

pub async fn load_catalog(
    source: &dyn CatalogSource,
    storer: Option<&dyn DocumentStorer>,
    force_refresh: bool,
) -> Result<Catalog, CatalogError> {
    let source_key = source.source_key();

    if !force_refresh
        && let Some(storer) = storer
        && let Some(catalog) = cached_catalog(storer, &source_key, true)
    {
        debug!("Using fresh cached catalog for {}", source_key);
        return Ok(catalog);
    }

    let fetched = source
        .fetch_document()
        .await
        .and_then(|body| Catalog::from_json(&body).map(|catalog| (catalog, body)));

    match fetched {
        Ok((catalog, body)) => {
            info!("Fetched catalog from {}", source_key);

            if let Some(storer) = storer {
                let _ = storer
                    .store_document(&source_key, &body)
                    .inspect_err(|e| warn!("Failed to cache catalog for {}: {}", source_key, e));
            }

            Ok(catalog)
        }
        Err(e) => {
            if let Some(storer) = storer
                && let Some(catalog) = cached_catalog(storer, &source_key, false)
            {
                warn!(
                    "Failed to load catalog from {}: {}. Using cached copy.",
                    source_key, e
                );
                return Ok(catalog);
            }
            Err(e)
        }
    }
}

fn cached_catalog(storer: &dyn DocumentStorer, source_key: &str, fresh_only: bool) -> Option<Catalog> {
    let document = if fresh_only {
        storer.get_fresh_document(source_key)
    } else {
        storer.get_document(source_key)
    };

    let document = document
        .inspect_err(|e| warn!("Failed to read cached catalog for {}: {}", source_key, e))
        .ok()??;

    Catalog::from_json(&document.body)
        .inspect_err(|e| warn!("Discarding unreadable cached catalog for {}: {}", source_key, e))
        .ok()
}
