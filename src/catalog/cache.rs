//! SQLite cache of fetched catalog documents

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

#[cfg(test)]
use mockall::automock;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::catalog::error::CacheError;

/// A cached catalog document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDocument {
    pub body: String,
    /// Milliseconds since UNIX epoch
    pub fetched_at: i64,
}

/// Trait for storing and retrieving catalog documents
#[cfg_attr(test, automock)]
pub trait DocumentStorer: Send + Sync {
    /// Document for `source_key` if it is younger than the refresh interval
    fn get_fresh_document(&self, source_key: &str) -> Result<Option<CachedDocument>, CacheError>;

    /// Document for `source_key` regardless of age
    fn get_document(&self, source_key: &str) -> Result<Option<CachedDocument>, CacheError>;

    /// Replace the document stored for `source_key`
    fn store_document(&self, source_key: &str, body: &str) -> Result<(), CacheError>;
}

pub struct CatalogCache {
    conn: Mutex<Connection>,
    refresh_interval: i64,
}

impl CatalogCache {
    pub fn new(db_path: &Path, refresh_interval: i64) -> Result<Self, CacheError> {
        info!("Initializing catalog cache at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let cache = Self {
            conn: Mutex::new(conn),
            refresh_interval,
        };

        cache.create_schema()?;
        debug!("Catalog cache initialized");

        Ok(cache)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    /// Current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS catalog_documents (
                source_key TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                fetched_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        Ok(())
    }

    /// Remove every cached document, returning how many were removed
    pub fn clear(&self) -> Result<usize, CacheError> {
        let conn = self.lock_conn()?;
        let removed = conn.execute("DELETE FROM catalog_documents", [])?;
        info!("Removed {} cached catalog documents", removed);
        Ok(removed)
    }

    fn query_document(
        &self,
        source_key: &str,
        min_fetched_at: i64,
    ) -> Result<Option<CachedDocument>, CacheError> {
        let conn = self.lock_conn()?;
        let document = conn
            .query_row(
                "SELECT body, fetched_at FROM catalog_documents WHERE source_key = ?1 AND fetched_at >= ?2",
                (source_key, min_fetched_at),
                |row| {
                    Ok(CachedDocument {
                        body: row.get(0)?,
                        fetched_at: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(document)
    }
}

impl DocumentStorer for CatalogCache {
    fn get_fresh_document(&self, source_key: &str) -> Result<Option<CachedDocument>, CacheError> {
        let threshold = Self::current_timestamp_ms().saturating_sub(self.refresh_interval);
        self.query_document(source_key, threshold)
    }

    fn get_document(&self, source_key: &str) -> Result<Option<CachedDocument>, CacheError> {
        self.query_document(source_key, i64::MIN)
    }

    fn store_document(&self, source_key: &str, body: &str) -> Result<(), CacheError> {
        let now = Self::current_timestamp_ms();
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            INSERT INTO catalog_documents (source_key, body, fetched_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(source_key) DO UPDATE SET body = excluded.body, fetched_at = excluded.fetched_at
            "#,
            (source_key, body, now),
        )?;

        debug!("Cached catalog document for {} ({} bytes)", source_key, body.len());
        Ok(())
    }
}
