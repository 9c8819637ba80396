//! Patch lookup for a resolved build
//!
//! A missing patch is a normal outcome: the caller falls back to a full
//! installer download.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::build::BuildNumber;
use crate::catalog::model::{Build, Patch};

/// Host platform, as named in patch exclusion lists
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Mac,
    Unix,
    /// Identifier outside the known vocabulary, lowercased
    Other(String),
}

impl Platform {
    /// Platform of the running host
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Mac
        } else if cfg!(unix) {
            Platform::Unix
        } else {
            Platform::Other(std::env::consts::OS.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Windows => "win",
            Platform::Mac => "mac",
            Platform::Unix => "unix",
            Platform::Other(name) => name,
        }
    }
}

impl FromStr for Platform {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Ok(match name.as_str() {
            "win" | "windows" => Platform::Windows,
            "mac" | "macos" | "osx" => Platform::Mac,
            "unix" | "linux" => Platform::Unix,
            _ => Platform::Other(name),
        })
    }
}

impl From<&str> for Platform {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(platform) => platform,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First patch of `build` that upgrades from `from` and is not excluded on `platform`
pub fn find_patch<'a>(build: &'a Build, from: &BuildNumber, platform: &Platform) -> Option<&'a Patch> {
    let patch = build
        .patches
        .iter()
        .find(|patch| patch.from == *from && patch.is_available(platform));

    match patch {
        Some(_) => debug!("Found patch {} -> {} for {}", from, build.number, platform),
        None => debug!(
            "No patch {} -> {} for {}, full installation required",
            from, build.number, platform
        ),
    }

    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bn(text: &str) -> BuildNumber {
        BuildNumber::parse(text).unwrap()
    }

    fn patch(from: &str, exclusions: &[&str]) -> Patch {
        Patch {
            from: bn(from),
            size: None,
            exclusions: exclusions.iter().map(|e| Platform::from(*e)).collect(),
        }
    }

    fn build_with(patches: Vec<Patch>) -> Build {
        Build {
            number: bn("145.597"),
            version: "2016.1.1".to_string(),
            release_date: None,
            message: None,
            target: None,
            patches,
        }
    }

    #[rstest]
    #[case("win")]
    #[case("mac")]
    #[case("unix")]
    fn excluded_patch_is_never_returned(#[case] platform: &str) {
        let build = build_with(vec![
            patch("145.596", &[]),
            patch("145.258", &["win", "mac", "unix"]),
        ]);

        assert!(find_patch(&build, &bn("145.258"), &Platform::from(platform)).is_none());
        assert!(find_patch(&build, &bn("145.596"), &Platform::from(platform)).is_some());
    }

    #[rstest]
    #[case("win")]
    #[case("mac")]
    #[case("unix")]
    #[case("freebsd")]
    fn patch_without_exclusions_is_returned_for_every_platform(#[case] platform: &str) {
        let build = build_with(vec![patch("145.596", &[])]);

        assert!(find_patch(&build, &bn("145.596"), &Platform::from(platform)).is_some());
    }

    #[test]
    fn first_available_patch_wins() {
        let build = build_with(vec![
            Patch {
                size: Some(10),
                ..patch("145.258", &["win"])
            },
            Patch {
                size: Some(20),
                ..patch("145.258", &[])
            },
            Patch {
                size: Some(30),
                ..patch("145.258", &[])
            },
        ]);

        let on_windows = find_patch(&build, &bn("145.258"), &Platform::Windows).unwrap();
        let on_mac = find_patch(&build, &bn("145.258"), &Platform::Mac).unwrap();

        assert_eq!(on_windows.size, Some(20));
        assert_eq!(on_mac.size, Some(10));
    }

    #[test]
    fn source_is_matched_without_product_code() {
        let build = build_with(vec![patch("145.596", &[])]);

        assert!(find_patch(&build, &bn("IU-145.596"), &Platform::Unix).is_some());
        assert!(find_patch(&build, &bn("145.595"), &Platform::Unix).is_none());
    }

    #[test]
    fn unknown_host_is_excluded_only_by_its_exact_name() {
        let build = build_with(vec![patch("145.596", &["FreeBSD"])]);

        assert!(find_patch(&build, &bn("145.596"), &Platform::from("freebsd")).is_none());
        assert!(find_patch(&build, &bn("145.596"), &Platform::from("solaris")).is_some());
    }

    #[rstest]
    #[case("Windows", Platform::Windows)]
    #[case("osx", Platform::Mac)]
    #[case("linux", Platform::Unix)]
    #[case("Haiku", Platform::Other("haiku".to_string()))]
    fn platform_parses_aliases(#[case] text: &str, #[case] expected: Platform) {
        assert_eq!(Platform::from(text), expected);
    }
}
