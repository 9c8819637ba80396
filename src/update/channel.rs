//! Channel tiers and subscription eligibility

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Channel tier, ordered from most conservative to most permissive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    #[default]
    Release,
    Beta,
    Eap,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown channel status '{0}', expected one of: release, beta, eap")]
pub struct UnknownChannelStatus(pub String);

impl ChannelStatus {
    /// All tiers from most permissive to most conservative
    pub const BY_EAGERNESS: [ChannelStatus; 3] =
        [ChannelStatus::Eap, ChannelStatus::Beta, ChannelStatus::Release];

    /// Lenient parsing for catalog documents: unknown codes become `Release`
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or_else(|_| {
            warn!("Unknown channel status '{}', treating as release", code);
            ChannelStatus::Release
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelStatus::Release => "release",
            ChannelStatus::Beta => "beta",
            ChannelStatus::Eap => "eap",
        }
    }

    /// Whether a user subscribed at `self` may receive builds from a `channel` tier
    pub fn allows(&self, channel: ChannelStatus) -> bool {
        channel <= *self
    }

    /// Tiers visible to a user subscribed at `self`, most permissive first
    pub fn eligible_statuses(&self) -> Vec<ChannelStatus> {
        Self::BY_EAGERNESS
            .into_iter()
            .filter(|status| self.allows(*status))
            .collect()
    }
}

impl FromStr for ChannelStatus {
    type Err = UnknownChannelStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "release" => Ok(ChannelStatus::Release),
            "beta" | "milestone" => Ok(ChannelStatus::Beta),
            "eap" => Ok(ChannelStatus::Eap),
            _ => Err(UnknownChannelStatus(s.to_string())),
        }
    }
}

/// Accepts the same spellings as `FromStr`
impl<'de> Deserialize<'de> for ChannelStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ChannelStatus::Release, vec![ChannelStatus::Release])]
    #[case(ChannelStatus::Beta, vec![ChannelStatus::Beta, ChannelStatus::Release])]
    #[case(
        ChannelStatus::Eap,
        vec![ChannelStatus::Eap, ChannelStatus::Beta, ChannelStatus::Release]
    )]
    fn eligible_statuses_include_every_more_conservative_tier(
        #[case] subscribed: ChannelStatus,
        #[case] expected: Vec<ChannelStatus>,
    ) {
        assert_eq!(subscribed.eligible_statuses(), expected);
    }

    #[rstest]
    #[case(ChannelStatus::Release, ChannelStatus::Beta, false)]
    #[case(ChannelStatus::Release, ChannelStatus::Eap, false)]
    #[case(ChannelStatus::Beta, ChannelStatus::Eap, false)]
    #[case(ChannelStatus::Beta, ChannelStatus::Release, true)]
    #[case(ChannelStatus::Eap, ChannelStatus::Eap, true)]
    fn allows_checks_tier_order(
        #[case] subscribed: ChannelStatus,
        #[case] channel: ChannelStatus,
        #[case] expected: bool,
    ) {
        assert_eq!(subscribed.allows(channel), expected);
    }

    #[rstest]
    #[case("release", Ok(ChannelStatus::Release))]
    #[case("BETA", Ok(ChannelStatus::Beta))]
    #[case("milestone", Ok(ChannelStatus::Beta))]
    #[case(" eap ", Ok(ChannelStatus::Eap))]
    #[case("nightly", Err(UnknownChannelStatus("nightly".to_string())))]
    fn from_str_parses_known_codes(
        #[case] code: &str,
        #[case] expected: Result<ChannelStatus, UnknownChannelStatus>,
    ) {
        assert_eq!(code.parse::<ChannelStatus>(), expected);
    }

    #[test]
    fn from_code_defaults_unknown_codes_to_release() {
        assert_eq!(ChannelStatus::from_code("nightly"), ChannelStatus::Release);
        assert_eq!(ChannelStatus::from_code("eap"), ChannelStatus::Eap);
    }

    #[rstest]
    #[case(r#""milestone""#, ChannelStatus::Beta)]
    #[case(r#""EAP""#, ChannelStatus::Eap)]
    #[case(r#""Release""#, ChannelStatus::Release)]
    fn deserializes_like_from_str(#[case] json: &str, #[case] expected: ChannelStatus) {
        let status: ChannelStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status, expected);
    }

    #[test]
    fn deserialize_rejects_unknown_codes() {
        let error = serde_json::from_str::<ChannelStatus>(r#""nightly""#).unwrap_err();
        assert!(error.to_string().contains("Unknown channel status 'nightly'"));
    }

    #[test]
    fn serializes_lowercase_codes() {
        assert_eq!(serde_json::to_string(&ChannelStatus::Eap).unwrap(), r#""eap""#);
    }
}
