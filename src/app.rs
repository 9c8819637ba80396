//! `check` command: load the catalog, resolve, and report

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, bail};
use serde::Serialize;
use tracing::warn;

use crate::build::BuildNumber;
use crate::catalog::cache::{CatalogCache, DocumentStorer};
use crate::catalog::loader::load_catalog;
use crate::catalog::source::CatalogSource;
use crate::catalog::sources::{FileCatalogSource, HttpCatalogSource};
use crate::config::ResolverConfig;
use crate::update::channel::ChannelStatus;
use crate::update::patch::Platform;
use crate::update::strategy::{CheckForUpdateResult, resolve};

/// Options for one `check` run, already merged from the command line
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub build: String,
    pub catalog_file: Option<PathBuf>,
    pub catalog_url: Option<String>,
    pub channel: Option<ChannelStatus>,
    pub ignored: Vec<String>,
    /// Patch source; defaults to the current build
    pub from: Option<String>,
    pub platform: Option<Platform>,
    pub refresh: bool,
    /// SQLite cache location; `None` disables caching
    pub cache_db: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchReport {
    pub from: String,
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub current_build: String,
    pub update_available: bool,
    pub build: Option<String>,
    pub version: Option<String>,
    pub release_date: Option<String>,
    pub message: Option<String>,
    pub channel: Option<String>,
    pub channel_status: Option<ChannelStatus>,
    pub channel_url: Option<String>,
    /// `None` with an update available means a full installation is needed
    pub patch: Option<PatchReport>,
    pub platform: String,
}

impl CheckReport {
    pub fn from_result(
        current_build: &str,
        result: CheckForUpdateResult<'_>,
        from: &BuildNumber,
        platform: &Platform,
    ) -> anyhow::Result<Self> {
        let patch = result
            .find_patch_for_build(from, platform)
            .map(|patch| PatchReport {
                from: patch.from.to_string(),
                size: patch.size,
            });
        let selection = result.into_result()?;

        Ok(Self {
            current_build: current_build.to_string(),
            update_available: selection.is_some(),
            build: selection.map(|(_, build)| build.number.to_string()),
            version: selection.map(|(_, build)| build.version.clone()),
            release_date: selection
                .and_then(|(_, build)| build.release_date)
                .map(|date| date.format("%Y-%m-%d").to_string()),
            message: selection.and_then(|(_, build)| build.message.clone()),
            channel: selection.map(|(channel, _)| channel.id.clone()),
            channel_status: selection.map(|(channel, _)| channel.status),
            channel_url: selection.and_then(|(channel, _)| channel.url.clone()),
            patch,
            platform: platform.to_string(),
        })
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(build), Some(channel)) = (&self.build, &self.channel) else {
            return writeln!(f, "{} is up to date", self.current_build);
        };

        writeln!(
            f,
            "Update available: {} ({}) from channel {}",
            build,
            self.version.as_deref().unwrap_or("unknown version"),
            channel
        )?;
        if let Some(date) = &self.release_date {
            writeln!(f, "Released: {}", date)?;
        }
        if let Some(message) = &self.message {
            writeln!(f, "{}", message)?;
        }
        match &self.patch {
            Some(patch) => writeln!(
                f,
                "Patch from {} available for {}{}",
                patch.from,
                self.platform,
                patch
                    .size
                    .map(|size| format!(" ({} MB)", size))
                    .unwrap_or_default()
            ),
            None => writeln!(f, "No patch for {}, full installation required", self.platform),
        }
    }
}

/// Run one update check
pub async fn run_check(options: CheckOptions, config: ResolverConfig) -> anyhow::Result<CheckReport> {
    let source = catalog_source(&options, &config)?;
    let cache = options
        .cache_db
        .as_deref()
        .and_then(|path| {
            CatalogCache::new(path, config.catalog.refresh_interval)
                .inspect_err(|e| warn!("Catalog cache unavailable, continuing without it: {}", e))
                .ok()
        });

    let catalog = load_catalog(
        source.as_ref(),
        cache.as_ref().map(|cache| cache as &dyn DocumentStorer),
        options.refresh,
    )
    .await
    .context("failed to load catalog")?;

    let mut settings = config.updates;
    if let Some(channel) = options.channel {
        settings.selected_channel = channel;
    }
    settings.ignored_builds.extend(options.ignored.iter().cloned());

    let result = resolve(&options.build, &settings, &catalog);
    if let Some(error) = result.error() {
        return Err(error.clone().into());
    }

    let from_text = options.from.as_deref().unwrap_or(&options.build);
    let from = BuildNumber::parse(from_text).context("invalid patch source build")?;
    let platform = options.platform.clone().unwrap_or_else(Platform::current);

    CheckReport::from_result(&options.build, result, &from, &platform)
}

fn catalog_source(
    options: &CheckOptions,
    config: &ResolverConfig,
) -> anyhow::Result<Box<dyn CatalogSource>> {
    if let Some(path) = &options.catalog_file {
        return Ok(Box::new(FileCatalogSource::new(path)));
    }

    match options.catalog_url.as_ref().or(config.catalog.url.as_ref()) {
        Some(url) => Ok(Box::new(HttpCatalogSource::new(url)?)),
        None => bail!("no catalog source: pass --catalog or --url, or set catalog.url in the config"),
    }
}
