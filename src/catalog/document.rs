//! JSON catalog document and its conversion into the in-memory model
//!
//! ```json
//! {
//!   "products": [{
//!     "name": "IntelliJ IDEA",
//!     "codes": ["IU", "IC"],
//!     "channels": [{
//!       "id": "IDEA_Release", "status": "release", "licensing": "release",
//!       "majorVersion": 2016,
//!       "builds": [{
//!         "number": "145.597", "version": "2016.1.1", "releaseDate": "20160420",
//!         "targetSince": "145.0", "targetUntil": "145.*",
//!         "patches": [{ "from": "145.258", "size": 12, "exclusions": ["win"] }]
//!       }]
//!     }]
//!   }]
//! }
//! ```
//!
//! Arrays are converted in order, so declaration order survives into the model.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::build::BuildNumber;
use crate::catalog::error::CatalogError;
use crate::catalog::model::{Build, Catalog, Channel, Licensing, Patch, Product, TargetRange};
use crate::update::channel::ChannelStatus;
use crate::update::patch::Platform;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogDocument {
    pub products: Vec<ProductDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductDocument {
    pub name: String,
    #[serde(default)]
    pub codes: Vec<String>,
    #[serde(default)]
    pub channels: Vec<ChannelDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDocument {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub licensing: Option<String>,
    #[serde(default)]
    pub major_version: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub eval_days: Option<u32>,
    #[serde(default)]
    pub builds: Vec<BuildDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDocument {
    pub number: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub target_since: Option<String>,
    #[serde(default)]
    pub target_until: Option<String>,
    #[serde(default)]
    pub patches: Vec<PatchDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatchDocument {
    pub from: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl Catalog {
    /// Parse a JSON catalog document
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(text)?;
        Catalog::try_from(document)
    }
}

impl TryFrom<CatalogDocument> for Catalog {
    type Error = CatalogError;

    fn try_from(document: CatalogDocument) -> Result<Self, Self::Error> {
        let products = document
            .products
            .into_iter()
            .map(convert_product)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded catalog with {} products", products.len());
        Ok(Catalog::new(products))
    }
}

fn convert_product(product: ProductDocument) -> Result<Product, CatalogError> {
    if product.codes.is_empty() {
        warn!("Product '{}' declares no codes and cannot be looked up", product.name);
    }

    let channels = product
        .channels
        .into_iter()
        .map(convert_channel)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Product {
        name: product.name,
        codes: product.codes,
        channels,
    })
}

fn convert_channel(channel: ChannelDocument) -> Result<Channel, CatalogError> {
    let builds = channel
        .builds
        .into_iter()
        .map(|build| convert_build(&channel.id, build))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Channel {
        status: channel
            .status
            .as_deref()
            .map_or(ChannelStatus::Release, ChannelStatus::from_code),
        licensing: channel
            .licensing
            .as_deref()
            .map_or(Licensing::Release, Licensing::from_code),
        id: channel.id,
        major_version: channel.major_version,
        url: channel.url,
        eval_days: channel.eval_days,
        builds,
    })
}

fn convert_build(channel_id: &str, build: BuildDocument) -> Result<Build, CatalogError> {
    let context = format!("channel '{}', build '{}'", channel_id, build.number);
    let number = parse_concrete(&build.number, &context)?;

    let since = parse_optional(build.target_since.as_deref(), &context)?;
    let until = parse_optional(build.target_until.as_deref(), &context)?;
    let target = (since.is_some() || until.is_some()).then_some(TargetRange { since, until });

    let patches = build
        .patches
        .into_iter()
        .map(|patch| -> Result<Patch, CatalogError> {
            Ok(Patch {
                from: parse_concrete(&patch.from, &context)?,
                size: patch.size,
                exclusions: patch
                    .exclusions
                    .iter()
                    .map(|name| Platform::from(name.as_str()))
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Build {
        number,
        version: build.version,
        release_date: build
            .release_date
            .as_deref()
            .and_then(|date| parse_release_date(date, &context)),
        message: build.message,
        target,
        patches,
    })
}

fn parse_concrete(text: &str, context: &str) -> Result<BuildNumber, CatalogError> {
    let number = BuildNumber::parse(text)
        .map_err(|e| CatalogError::InvalidDocument(format!("{}: {}", context, e)))?;
    if number.is_wildcard() {
        return Err(CatalogError::InvalidDocument(format!(
            "{}: wildcard '{}' is only allowed in target ranges",
            context, text
        )));
    }
    Ok(number)
}

fn parse_optional(text: Option<&str>, context: &str) -> Result<Option<BuildNumber>, CatalogError> {
    text.map(|text| {
        BuildNumber::parse(text)
            .map_err(|e| CatalogError::InvalidDocument(format!("{}: {}", context, e)))
    })
    .transpose()
}

fn parse_release_date(text: &str, context: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .inspect_err(|_| warn!("Ignoring unparseable release date '{}' ({})", text, context))
        .ok()
}
