//! Concrete catalog sources

pub mod file;
pub mod http;

pub use file::FileCatalogSource;
pub use http::HttpCatalogSource;
