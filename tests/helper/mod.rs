//! Shared test utilities

#![allow(dead_code, unused_imports)]

pub mod catalog;

pub use catalog::{ChannelSpec, build_catalog, catalog_json, write_catalog};
