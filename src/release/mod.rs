//! Release workflows
//!
//! [cut::CutRelease] branches a release off trunk and advances trunk to the
//! next development version. [finalize::FinalizeRelease] tags and publishes
//! a release from its branch. Both are a fixed, strictly sequential list of
//! steps: every precondition is checked before the first mutating command,
//! and any failure aborts the remaining steps.

pub mod cut;
pub mod finalize;

pub use cut::CutRelease;
pub use finalize::FinalizeRelease;

use crate::domain::{PomFile, ReleaseBranch, TagSet, Version};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use tracing::debug;

/// Project-specific edits to the manifest at fixed points of a release
///
/// Every method defaults to doing nothing.
pub trait ManifestHook {
    /// Before trunk moves to the next development version
    fn on_cut(&self, _pom: &PomFile, _version: &Version) -> Result<()> {
        Ok(())
    }

    /// On the release branch, before the release plugin runs
    fn before_prepare(&self, _pom: &PomFile, _version: &Version) -> Result<()> {
        Ok(())
    }

    /// On the release branch, after the release plugin ran
    fn after_prepare(&self, _pom: &PomFile, _version: &Version) -> Result<()> {
        Ok(())
    }
}

/// Leaves the manifest alone
#[derive(Debug, Clone, Copy, Default)]
pub struct NoManifestEdits;

impl ManifestHook for NoManifestEdits {}

/// Require a clean tree, then bring trunk up to date with upstream
pub fn sanitize_repository(repository: &dyn Repository, trunk: &str) -> Result<()> {
    if !repository.status()?.is_empty() {
        return Err(ReleaseError::UncommittedChanges);
    }
    repository.checkout(Some(trunk), None)?;
    repository.fast_forward_upstream(trunk)?;
    repository.fetch_upstream(None)?;
    debug!(trunk, "repository sanitized");
    Ok(())
}

/// The version the caller asked for must be the one found
pub fn check_version(expected: &Version, actual: &Version) -> Result<()> {
    if expected != actual {
        return Err(ReleaseError::version_mismatch(expected, actual));
    }
    Ok(())
}

pub fn check_tags(repository: &dyn Repository, version: &Version) -> Result<()> {
    TagSet::new(repository.tags()?).check_releasable(version)
}

pub fn check_release_not_cut(repository: &dyn Repository, version: &Version) -> Result<()> {
    let branch = ReleaseBranch::for_version(version);
    if !repository.list_upstream_heads(&branch.name)?.is_empty() {
        return Err(ReleaseError::ReleaseAlreadyCut(version.to_string()));
    }
    Ok(())
}

pub fn check_release_cut(repository: &dyn Repository, version: &Version) -> Result<()> {
    let branch = ReleaseBranch::for_version(version);
    if repository.list_upstream_heads(&branch.name)?.is_empty() {
        return Err(ReleaseError::ReleaseNotCut(version.to_string()));
    }
    Ok(())
}
