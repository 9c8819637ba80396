//! Catalog layer: the published product/channel/build metadata
//!
//! - [`model`]: Immutable in-memory catalog
//! - [`document`]: JSON document format and conversion into the model
//! - [`source`]: Trait for fetching catalog documents
//! - [`sources`]: HTTP and file implementations
//! - [`cache`]: SQLite cache of fetched documents
//! - [`loader`]: Cache-aware catalog loading
//! - [`error`]: Error types for fetching, parsing and caching

pub mod cache;
pub mod document;
pub mod error;
pub mod loader;
pub mod model;
pub mod source;
pub mod sources;

pub use error::{CacheError, CatalogError};
pub use loader::load_catalog;
pub use model::{Build, Catalog, Channel, Licensing, Patch, Product, TargetRange};
pub use source::CatalogSource;
