//! In-memory catalog of products, channels, builds and patches
//!
//! Channels and builds are kept as `Vec`s in declaration order; that order
//! breaks ties between equal candidates during resolution.

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::build::BuildNumber;
use crate::update::channel::ChannelStatus;
use crate::update::patch::Platform;

/// Licensing kind of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Licensing {
    Eap,
    #[default]
    Release,
}

impl Licensing {
    /// Unknown codes fall back to `Release`
    pub fn from_code(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case("eap") {
            Licensing::Eap
        } else {
            Licensing::Release
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Licensing::Eap => "eap",
            Licensing::Release => "release",
        }
    }
}

/// Optional `[since, until]` interval of current builds a build is offered to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRange {
    pub since: Option<BuildNumber>,
    pub until: Option<BuildNumber>,
}

impl TargetRange {
    pub fn contains(&self, current: &BuildNumber) -> bool {
        current.is_within_range(self.since.as_ref(), self.until.as_ref())
    }
}

/// Incremental upgrade from `from` to the owning build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub from: BuildNumber,
    /// Download size in megabytes
    pub size: Option<u64>,
    pub exclusions: Vec<Platform>,
}

impl Patch {
    pub fn is_available(&self, platform: &Platform) -> bool {
        !self.exclusions.contains(platform)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub number: BuildNumber,
    /// Human-facing version, e.g. "2016.1.1"
    pub version: String,
    pub release_date: Option<NaiveDate>,
    pub message: Option<String>,
    /// `None` means the build is offered to every installation
    pub target: Option<TargetRange>,
    pub patches: Vec<Patch>,
}

impl Build {
    pub fn is_targeted_at(&self, current: &BuildNumber) -> bool {
        self.target
            .as_ref()
            .is_none_or(|target| target.contains(current))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub status: ChannelStatus,
    pub licensing: Licensing,
    pub major_version: Option<u32>,
    pub url: Option<String>,
    pub eval_days: Option<u32>,
    pub builds: Vec<Build>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub codes: Vec<String>,
    pub channels: Vec<Channel>,
}

/// Read-only catalog keyed by product code
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_code: IndexMap<String, usize>,
}

impl Catalog {
    /// Build a catalog; when two products share a code the first one keeps it
    pub fn new(products: Vec<Product>) -> Self {
        let mut by_code = IndexMap::new();
        for (index, product) in products.iter().enumerate() {
            for code in &product.codes {
                by_code.entry(code.clone()).or_insert(index);
            }
        }
        Self { products, by_code }
    }

    pub fn product(&self, code: &str) -> Option<&Product> {
        self.by_code.get(code).map(|&index| &self.products[index])
    }

    /// Channels of the product with `code`, in declaration order
    pub fn channels(&self, code: &str) -> Option<&[Channel]> {
        self.product(code).map(|product| product.channels.as_slice())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Product codes in first-declaration order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.by_code.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
