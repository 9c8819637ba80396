//! Catalog builders for tests

use std::path::PathBuf;

use serde_json::{Value, json};
use tempfile::TempDir;

use update_resolver::catalog::Catalog;

/// A channel with plain builds (number doubles as version)
pub struct ChannelSpec {
    pub id: &'static str,
    pub status: &'static str,
    pub builds: Vec<Value>,
}

impl ChannelSpec {
    pub fn new(id: &'static str, status: &'static str, numbers: &[&str]) -> Self {
        Self {
            id,
            status,
            builds: numbers
                .iter()
                .map(|number| json!({ "number": number, "version": number }))
                .collect(),
        }
    }

    pub fn with_build(mut self, build: Value) -> Self {
        self.builds.push(build);
        self
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "status": self.status,
            "licensing": self.status,
            "builds": self.builds,
        })
    }
}

/// JSON document with one product (codes `IU`, `IC`) holding `channels` in order
pub fn catalog_json(channels: &[ChannelSpec]) -> String {
    let channels: Vec<Value> = channels.iter().map(ChannelSpec::to_json).collect();
    json!({
        "products": [{
            "name": "IntelliJ IDEA",
            "codes": ["IU", "IC"],
            "channels": channels,
        }]
    })
    .to_string()
}

pub fn build_catalog(channels: &[ChannelSpec]) -> Catalog {
    Catalog::from_json(&catalog_json(channels)).unwrap()
}

/// Write the catalog document to a temp file
pub fn write_catalog(channels: &[ChannelSpec]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("updates.json");
    std::fs::write(&path, catalog_json(channels)).unwrap();
    (temp_dir, path)
}
