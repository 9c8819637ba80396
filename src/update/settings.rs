//! User update settings consumed by the resolver

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::update::channel::ChannelStatus;

/// Source of the user's update preferences, read once per resolution
#[cfg_attr(test, automock)]
pub trait UpdateSettingsProvider {
    /// Most permissive channel tier the user subscribed to
    fn selected_channel_status(&self) -> ChannelStatus;

    /// Build numbers the user chose to skip, as entered (e.g. "145.596")
    fn ignored_build_numbers(&self) -> Vec<String>;
}

/// Plain settings value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateSettings {
    pub selected_channel: ChannelStatus,
    pub ignored_builds: Vec<String>,
}

impl UpdateSettings {
    pub fn new(selected_channel: ChannelStatus) -> Self {
        Self {
            selected_channel,
            ignored_builds: Vec::new(),
        }
    }

    pub fn with_ignored<I, S>(mut self, builds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_builds.extend(builds.into_iter().map(Into::into));
        self
    }
}

impl UpdateSettingsProvider for UpdateSettings {
    fn selected_channel_status(&self) -> ChannelStatus {
        self.selected_channel
    }

    fn ignored_build_numbers(&self) -> Vec<String> {
        self.ignored_builds.clone()
    }
}
