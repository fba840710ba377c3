use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Textual rules shared by every version of a project.
///
/// A family fixes the constant prefix in front of the major number and the
/// suffix that marks an in-development snapshot. Parsing and formatting go
/// through the family so the numeric algebra on [`Version`] stays independent
/// of how a project spells its versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionFamily {
    pub prefix: &'static str,
    pub snapshot_suffix: &'static str,
}

impl VersionFamily {
    /// `0.MAJOR[.MINOR]`, snapshots suffixed with `-SNAPSHOT`.
    pub const ZERO_MAJOR: VersionFamily = VersionFamily {
        prefix: "0.",
        snapshot_suffix: "-SNAPSHOT",
    };

    /// Parse a release string such as `0.231` or `0.231.2`
    pub fn parse_release(&self, text: &str) -> Result<Version> {
        self.parse(text, "")
    }

    /// Parse a snapshot string such as `0.232-SNAPSHOT`
    pub fn parse_snapshot(&self, text: &str) -> Result<Version> {
        self.parse(text, self.snapshot_suffix)
    }

    pub fn release_string(&self, version: &Version) -> String {
        match version.minor {
            Some(minor) => format!("{}{}.{}", self.prefix, version.major, minor),
            None => format!("{}{}", self.prefix, version.major),
        }
    }

    pub fn snapshot_string(&self, version: &Version) -> String {
        format!("{}{}", self.release_string(version), self.snapshot_suffix)
    }

    fn parse(&self, text: &str, suffix: &str) -> Result<Version> {
        let pattern = format!(
            r"^{}([1-9][0-9]*)(?:\.([1-9][0-9]*))?{}$",
            regex::escape(self.prefix),
            regex::escape(suffix)
        );
        let re = Regex::new(&pattern)
            .map_err(|e| ReleaseError::InvalidVersionFormat(format!("{}: {}", text, e)))?;

        let captures = re
            .captures(text)
            .ok_or_else(|| ReleaseError::InvalidVersionFormat(text.to_string()))?;

        let number = |index: usize| -> Result<Option<u32>> {
            captures
                .get(index)
                .map(|m| {
                    m.as_str()
                        .parse::<u32>()
                        .map_err(|_| ReleaseError::InvalidVersionFormat(text.to_string()))
                })
                .transpose()
        };

        let major = number(1)?.ok_or_else(|| ReleaseError::InvalidVersionFormat(text.to_string()))?;
        Version::new(major, number(2)?)
    }
}

/// A `MAJOR[.MINOR]` release version.
///
/// A version carrying a minor component is a hot-fix of its major version.
/// Values are immutable: every transform returns a new version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: Option<u32>,
}

impl Version {
    /// Create a version, rejecting non-positive components
    pub fn new(major: u32, minor: Option<u32>) -> Result<Self> {
        if major == 0 {
            return Err(ReleaseError::InvalidVersionNumber(0));
        }
        if minor == Some(0) {
            return Err(ReleaseError::InvalidVersionNumber(0));
        }
        Ok(Version { major, minor })
    }

    pub fn parse_release(text: &str) -> Result<Self> {
        VersionFamily::ZERO_MAJOR.parse_release(text)
    }

    pub fn parse_snapshot(text: &str) -> Result<Self> {
        VersionFamily::ZERO_MAJOR.parse_snapshot(text)
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> Option<u32> {
        self.minor
    }

    pub fn is_hot_fix(&self) -> bool {
        self.minor.is_some()
    }

    /// The major version this version belongs to (minor dropped)
    pub fn major_version(&self) -> Version {
        Version {
            major: self.major,
            minor: None,
        }
    }

    pub fn last_major_version(&self) -> Result<Version> {
        Version::new(self.major - 1, None)
    }

    pub fn next_major_version(&self) -> Result<Version> {
        let major = self
            .major
            .checked_add(1)
            .ok_or(ReleaseError::InvalidVersionNumber(i64::from(self.major) + 1))?;
        Version::new(major, None)
    }

    /// The hot-fix before this one; the first hot-fix steps back to the
    /// bare major version.
    pub fn last_minor_version(&self) -> Result<Version> {
        match self.minor {
            None => Err(ReleaseError::NoPriorMinorVersion(self.release_string())),
            Some(1) => Ok(self.major_version()),
            Some(minor) => Version::new(self.major, Some(minor - 1)),
        }
    }

    pub fn next_minor_version(&self) -> Result<Version> {
        let minor = self.minor.unwrap_or(0);
        let next = minor
            .checked_add(1)
            .ok_or(ReleaseError::InvalidVersionNumber(i64::from(minor) + 1))?;
        Version::new(self.major, Some(next))
    }

    /// The release that must already be tagged before this one can ship:
    /// the last minor version of a hot-fix, the last major version otherwise.
    pub fn previous_version(&self) -> Result<Version> {
        if self.is_hot_fix() {
            self.last_minor_version()
        } else {
            self.last_major_version()
        }
    }

    pub fn release_string(&self) -> String {
        VersionFamily::ZERO_MAJOR.release_string(self)
    }

    pub fn snapshot_string(&self) -> String {
        VersionFamily::ZERO_MAJOR.snapshot_string(self)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.release_string())
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse_release(s)
    }
}
