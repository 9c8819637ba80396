//! Update resolution
//!
//! Picks the single build a running installation should update to:
//! 1. Walk eligible channels, most permissive tier first, keeping declaration
//!    order within a tier, and each channel's builds in declaration order.
//! 2. Drop builds that are not newer, ignored by the user, or targeted at
//!    other installations.
//! 3. Prefer builds sharing the current baseline, then the highest number,
//!    then the first one seen.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::build::{BuildNumber, BuildNumberError};
use crate::catalog::model::{Build, Catalog, Channel, Patch};
use crate::update::channel::ChannelStatus;
use crate::update::error::ResolveError;
use crate::update::patch::{Platform, find_patch};
use crate::update::settings::UpdateSettingsProvider;

/// Lifecycle state of a resolution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateState {
    Loaded,
    Failed(ResolveError),
}

/// Outcome of one resolution call; borrows the selected build from the catalog
#[derive(Debug, Clone)]
pub struct CheckForUpdateResult<'c> {
    state: UpdateState,
    new_build: Option<&'c Build>,
    updated_channel: Option<&'c Channel>,
}

impl<'c> CheckForUpdateResult<'c> {
    fn loaded(selection: Option<Candidate<'c>>) -> Self {
        Self {
            state: UpdateState::Loaded,
            new_build: selection.map(|c| c.build),
            updated_channel: selection.map(|c| c.channel),
        }
    }

    fn failed(error: ResolveError) -> Self {
        Self {
            state: UpdateState::Failed(error),
            new_build: None,
            updated_channel: None,
        }
    }

    pub fn state(&self) -> &UpdateState {
        &self.state
    }

    pub fn error(&self) -> Option<&ResolveError> {
        match &self.state {
            UpdateState::Failed(error) => Some(error),
            UpdateState::Loaded => None,
        }
    }

    /// Selected build, `None` when no update is available or resolution failed
    pub fn new_build(&self) -> Option<&'c Build> {
        self.new_build
    }

    /// Channel the selected build was taken from
    pub fn updated_channel(&self) -> Option<&'c Channel> {
        self.updated_channel
    }

    pub fn is_update_available(&self) -> bool {
        self.new_build.is_some()
    }

    /// Patch from `from` to the selected build usable on `platform`
    pub fn find_patch_for_build(&self, from: &BuildNumber, platform: &Platform) -> Option<&'c Patch> {
        self.new_build
            .and_then(|build| find_patch(build, from, platform))
    }

    /// Convert into a `Result`, for callers that propagate with `?`
    pub fn into_result(self) -> Result<Option<(&'c Channel, &'c Build)>, ResolveError> {
        match self.state {
            UpdateState::Failed(error) => Err(error),
            UpdateState::Loaded => Ok(self.updated_channel.zip(self.new_build)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate<'c> {
    channel: &'c Channel,
    build: &'c Build,
}

/// Resolver bound to one installation, one catalog snapshot and one settings snapshot
pub struct UpdateStrategy<'c, 's, S: UpdateSettingsProvider + ?Sized> {
    current_build: BuildNumber,
    catalog: &'c Catalog,
    settings: &'s S,
}

impl<'c, 's, S: UpdateSettingsProvider + ?Sized> UpdateStrategy<'c, 's, S> {
    pub fn new(current_build: BuildNumber, catalog: &'c Catalog, settings: &'s S) -> Self {
        Self {
            current_build,
            catalog,
            settings,
        }
    }

    pub fn current_build(&self) -> &BuildNumber {
        &self.current_build
    }

    pub fn check_for_updates(&self) -> CheckForUpdateResult<'c> {
        match self.select() {
            Ok(Some(selected)) => {
                info!(
                    "Update available for {}: {} ({}) from channel {}",
                    self.current_build,
                    selected.build.number,
                    selected.build.version,
                    selected.channel.id
                );
                CheckForUpdateResult::loaded(Some(selected))
            }
            Ok(None) => {
                info!("No update available for {}", self.current_build);
                CheckForUpdateResult::loaded(None)
            }
            Err(e) => {
                warn!("Update check for {} failed: {}", self.current_build, e);
                CheckForUpdateResult::failed(e)
            }
        }
    }

    fn select(&self) -> Result<Option<Candidate<'c>>, ResolveError> {
        if self.current_build.is_wildcard() {
            return Err(BuildNumberError::malformed(
                &self.current_build.to_string(),
                "current build cannot contain a wildcard",
            )
            .into());
        }

        let channels = self
            .current_build
            .product_code()
            .and_then(|code| self.catalog.channels(code))
            .ok_or_else(|| ResolveError::NoSuchProduct(self.current_build.to_string()))?;

        let subscribed = self.settings.selected_channel_status();
        let ignored = self.ignored_builds();
        let baseline = self.current_build.baseline();

        debug!(
            "Resolving {} against {} channels, subscribed to {}",
            self.current_build,
            channels.len(),
            subscribed
        );

        let candidates = scan_order(channels, subscribed)
            .filter(|candidate| self.is_applicable(candidate, &ignored));

        Ok(select_best(candidates, baseline))
    }

    fn is_applicable(&self, candidate: &Candidate<'_>, ignored: &HashSet<BuildNumber>) -> bool {
        let build = candidate.build;
        if build.number <= self.current_build {
            return false;
        }
        if ignored.contains(&build.number) {
            debug!("Skipping {} from {}: ignored", build.number, candidate.channel.id);
            return false;
        }
        if !build.is_targeted_at(&self.current_build) {
            debug!(
                "Skipping {} from {}: not targeted at {}",
                build.number, candidate.channel.id, self.current_build
            );
            return false;
        }
        true
    }

    fn ignored_builds(&self) -> HashSet<BuildNumber> {
        self.settings
            .ignored_build_numbers()
            .iter()
            .filter_map(|text| {
                BuildNumber::parse(text)
                    .inspect_err(|e| warn!("Skipping ignored build entry: {}", e))
                    .ok()
            })
            .collect()
    }
}

/// Resolve an update for the installation running `current_build`
pub fn resolve<'c, S: UpdateSettingsProvider + ?Sized>(
    current_build: &str,
    settings: &S,
    catalog: &'c Catalog,
) -> CheckForUpdateResult<'c> {
    match BuildNumber::parse(current_build) {
        Ok(current) => UpdateStrategy::new(current, catalog, settings).check_for_updates(),
        Err(e) => {
            warn!("Update check failed: {}", e);
            CheckForUpdateResult::failed(e.into())
        }
    }
}

/// (channel, build) pairs in tie-break order
fn scan_order<'c>(
    channels: &'c [Channel],
    subscribed: ChannelStatus,
) -> impl Iterator<Item = Candidate<'c>> {
    subscribed
        .eligible_statuses()
        .into_iter()
        .flat_map(move |status| channels.iter().filter(move |ch| ch.status == status))
        .flat_map(|channel| {
            channel
                .builds
                .iter()
                .map(move |build| Candidate { channel, build })
        })
}

/// Baseline affinity first, then build number
fn compare_candidates(a: &Candidate<'_>, b: &Candidate<'_>, baseline: u32) -> Ordering {
    let affine = |c: &Candidate<'_>| c.build.number.baseline() == baseline;
    affine(a)
        .cmp(&affine(b))
        .then_with(|| a.build.number.cmp(&b.build.number))
}

/// Linear scan keeping the first of equal candidates
fn select_best<'c>(
    candidates: impl IntoIterator<Item = Candidate<'c>>,
    baseline: u32,
) -> Option<Candidate<'c>> {
    candidates
        .into_iter()
        .fold(None, |best, candidate| match best {
            Some(best) if compare_candidates(&candidate, &best, baseline) != Ordering::Greater => {
                Some(best)
            }
            _ => Some(candidate),
        })
}
