use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use std::collections::BTreeSet;

/// Tags known to the repository, as returned by `git tag`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    names: BTreeSet<String>,
}

impl TagSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagSet {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.names.contains(&version.release_string())
    }

    /// Verify `version` can be released: its predecessor is tagged and it is not.
    pub fn check_releasable(&self, version: &Version) -> Result<()> {
        let previous = version.previous_version()?;
        if !self.contains(&previous) {
            return Err(ReleaseError::TagNotFound {
                version: version.release_string(),
                tag: previous.release_string(),
            });
        }
        if self.contains(version) {
            return Err(ReleaseError::TagAlreadyExists {
                version: version.release_string(),
                tag: version.release_string(),
            });
        }
        Ok(())
    }
}
