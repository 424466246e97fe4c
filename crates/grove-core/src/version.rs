//! Toolkit version parsing and ordering.
//!
//! Toolkit releases are named loosely (`2.5.3`, `3.0.0-beta-1`, `1.6.0-RC-2`,
//! `1.5-beta-1`), so parsing is lenient and the ordering places pre-release
//! tags before the release they lead up to.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use grove_util::errors::GroveError;
use serde::{Deserialize, Serialize};

/// A four-part version: `major.minor.revision[-tag]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    major: u32,
    minor: u32,
    revision: u32,
    tag: Option<Cow<'static, str>>,
}

impl Version {
    /// A release version with no tag.
    pub const fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision,
            tag: None,
        }
    }

    /// A tagged version built from a static tag, usable in `const` tables.
    pub const fn tagged(major: u32, minor: u32, revision: u32, tag: &'static str) -> Self {
        Self {
            major,
            minor,
            revision,
            tag: Some(Cow::Borrowed(tag)),
        }
    }

    /// A version with an owned, optional tag. Empty tags are treated as absent.
    pub fn with_tag(major: u32, minor: u32, revision: u32, tag: Option<String>) -> Self {
        Self {
            major,
            minor,
            revision,
            tag: tag.filter(|t| !t.is_empty()).map(Cow::Owned),
        }
    }

    /// Parse a loosely delimited version string.
    ///
    /// Up to four components separated by `.`, `_` or `-` are consumed. The
    /// first must be numeric. The second and third are numeric when they
    /// parse; once one does not, it and everything after it are joined with
    /// `-` into the tag.
    pub fn parse(input: &str) -> Result<Self, GroveError> {
        let invalid = |reason: &str| GroveError::InvalidVersionFormat {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("version must not be empty"));
        }

        let parts: Vec<&str> = trimmed.splitn(4, ['.', '_', '-']).collect();
        let major = parts[0]
            .parse::<u32>()
            .map_err(|_| invalid("leading component is not numeric"))?;

        let mut numbers = [0u32; 2];
        let mut tag_parts: Vec<&str> = Vec::new();
        for (i, part) in parts.iter().enumerate().skip(1) {
            if tag_parts.is_empty() && i < 3 {
                if let Ok(n) = part.parse::<u32>() {
                    numbers[i - 1] = n;
                    continue;
                }
            }
            if !part.is_empty() {
                tag_parts.push(part);
            }
        }

        let tag = (!tag_parts.is_empty()).then(|| tag_parts.join("-"));
        Ok(Self::with_tag(major, numbers[0], numbers[1], tag))
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Whether both versions share the same `major.minor` line.
    pub fn same_line(&self, other: &Version) -> bool {
        self.major == other.major && self.minor == other.minor
    }

    /// Compare two versions.
    ///
    /// Numeric parts compare first. On a tie, two tags compare as text with
    /// `beta` rewritten to ` beta`. When only one side has a tag, the untagged
    /// side is newer if `no_tags_are_newer` is set and older otherwise.
    pub fn compare_with(&self, other: &Version, no_tags_are_newer: bool) -> Ordering {
        let numeric = (self.major, self.minor, self.revision).cmp(&(
            other.major,
            other.minor,
            other.revision,
        ));
        if numeric != Ordering::Equal {
            return numeric;
        }

        match (self.tag(), other.tag()) {
            (None, None) => Ordering::Equal,
            (Some(mine), Some(theirs)) => {
                mine.replace("beta", " beta").cmp(&theirs.replace("beta", " beta"))
            }
            (None, Some(_)) if no_tags_are_newer => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) if no_tags_are_newer => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        }
    }

    /// `self >= other` with releases newer than their pre-releases.
    pub fn at_least(&self, other: &Version) -> bool {
        self.compare_with(other, true) != Ordering::Less
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_with(other, true)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)?;
        if let Some(tag) = self.tag() {
            write!(f, "-{tag}")?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = GroveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = GroveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}
