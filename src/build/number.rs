//! Build numbers of variable length
//!
//! Format: `[CODE-]N(.N)*[.*]`
//! - `IU-145.258` - product code `IU`, components `145`, `258`
//! - `162.11.10` - no product code, three components
//! - `145.*` - wildcard tail, only meaningful as a target-range bound
//!
//! Ordering compares components left to right; a strict prefix is smaller,
//! and a wildcard is greater than any number at its position. The product
//! code never takes part in ordering, equality or hashing.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::build::error::BuildNumberError;

/// Token used for a wildcard component
pub const WILDCARD_TOKEN: &str = "*";

/// Matches an optional `CODE-` prefix followed by the numeric body
static PRODUCT_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([A-Za-z][A-Za-z0-9_]*)-)?(.*)$").expect("product code regex is valid")
});

/// A single build number component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Number(u32),
    /// Matches any value here and at every later position
    Wildcard,
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Component::Number(a), Component::Number(b)) => a.cmp(b),
            (Component::Number(_), Component::Wildcard) => Ordering::Less,
            (Component::Wildcard, Component::Number(_)) => Ordering::Greater,
            (Component::Wildcard, Component::Wildcard) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Number(n) => write!(f, "{}", n),
            Component::Wildcard => f.write_str(WILDCARD_TOKEN),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildNumber {
    product_code: Option<String>,
    /// Never empty; the first component is always a number
    components: Vec<Component>,
}

impl BuildNumber {
    /// Parse a build number, accepting an optional product-code prefix and
    /// a trailing wildcard component.
    pub fn parse(text: &str) -> Result<Self, BuildNumberError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(BuildNumberError::malformed(text, "empty build number"));
        }

        let captures = PRODUCT_CODE_RE
            .captures(trimmed)
            .ok_or_else(|| BuildNumberError::malformed(text, "unrecognized format"))?;
        let product_code = captures.get(1).map(|m| m.as_str().to_string());
        let body = captures.get(2).map_or("", |m| m.as_str());

        if body.is_empty() {
            return Err(BuildNumberError::malformed(text, "missing components"));
        }

        let parts: Vec<&str> = body.split('.').collect();
        let last = parts.len() - 1;
        let mut components = Vec::with_capacity(parts.len());

        for (index, part) in parts.iter().enumerate() {
            let component = if *part == WILDCARD_TOKEN {
                if index == 0 {
                    return Err(BuildNumberError::malformed(
                        text,
                        "first component must be a number",
                    ));
                }
                if index != last {
                    return Err(BuildNumberError::malformed(
                        text,
                        "wildcard is only allowed as the last component",
                    ));
                }
                Component::Wildcard
            } else if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                part.parse::<u32>()
                    .map(Component::Number)
                    .map_err(|_| BuildNumberError::malformed(text, "component out of range"))?
            } else {
                return Err(BuildNumberError::malformed(
                    text,
                    "components must be non-negative integers",
                ));
            };
            components.push(component);
        }

        Ok(Self {
            product_code,
            components,
        })
    }

    pub fn product_code(&self) -> Option<&str> {
        self.product_code.as_deref()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Leading component, grouping builds into one upgrade lineage
    pub fn baseline(&self) -> u32 {
        match self.components.first() {
            Some(Component::Number(n)) => *n,
            // parse() guarantees a leading number
            _ => 0,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.components.last(), Some(Component::Wildcard))
    }

    /// Whether this build lies within `[since, until]`.
    ///
    /// A missing bound is unbounded on that side. A wildcard in `until`
    /// admits everything under its prefix; a wildcard in `since` is treated
    /// as the lowest value, so `145.*` as a lower bound admits all of `145`.
    pub fn is_within_range(&self, since: Option<&BuildNumber>, until: Option<&BuildNumber>) -> bool {
        let above_since = since.is_none_or(|since| {
            self.components.as_slice() >= since.components_without_wildcard()
        });
        let below_until = until.is_none_or(|until| self <= until);
        above_since && below_until
    }

    /// Render without the `CODE-` prefix, as used in settings and patch sources
    pub fn as_string_without_product_code(&self) -> String {
        self.components
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    fn components_without_wildcard(&self) -> &[Component] {
        match self.components.split_last() {
            Some((Component::Wildcard, rest)) => rest,
            _ => &self.components,
        }
    }
}

impl PartialEq for BuildNumber {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for BuildNumber {}

impl Hash for BuildNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

impl Ord for BuildNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lexicographic slice ordering: a strict prefix sorts first
        self.components.cmp(&other.components)
    }
}

impl PartialOrd for BuildNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for BuildNumber {
    type Err = BuildNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildNumber::parse(s)
    }
}

impl fmt::Display for BuildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = &self.product_code {
            write!(f, "{}-", code)?;
        }
        f.write_str(&self.as_string_without_product_code())
    }
}
