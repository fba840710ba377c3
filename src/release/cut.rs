use crate::build::BuildTool;
use crate::domain::{PomFile, ReleaseBranch, Version};
use crate::error::Result;
use crate::git::{RemoteKind, Repository};
use crate::release::{
    check_release_not_cut, check_tags, check_version, sanitize_repository, ManifestHook,
};
use tracing::info;

/// Create the release branch for the version on trunk and move trunk on
pub struct CutRelease<'a> {
    repository: &'a dyn Repository,
    build: &'a dyn BuildTool,
    hook: &'a dyn ManifestHook,
    trunk: String,
    expected_version: Option<Version>,
}

impl<'a> CutRelease<'a> {
    pub fn new(
        repository: &'a dyn Repository,
        build: &'a dyn BuildTool,
        hook: &'a dyn ManifestHook,
        trunk: impl Into<String>,
    ) -> Self {
        CutRelease {
            repository,
            build,
            hook,
            trunk: trunk.into(),
            expected_version: None,
        }
    }

    /// Fail unless trunk is at exactly `version`
    pub fn expect_version(mut self, version: Option<Version>) -> Self {
        self.expected_version = version;
        self
    }

    /// Returns the created release branch
    pub fn run(&self) -> Result<ReleaseBranch> {
        let repository = self.repository;
        sanitize_repository(repository, &self.trunk)?;

        let pom = PomFile::in_directory(repository.directory())?;
        let version = pom.version()?;
        if let Some(expected) = &self.expected_version {
            check_version(expected, &version)?;
        }
        check_tags(repository, &version)?;
        check_release_not_cut(repository, &version)?;
        let snapshot = version.next_major_version()?.snapshot_string();

        self.hook.on_cut(&pom, &version)?;

        self.build.set_version(&snapshot)?;
        repository.add(".")?;
        repository.commit(&format!(
            "Prepare for next development iteration - {}",
            snapshot
        ))?;
        repository.push(RemoteKind::Upstream, &self.trunk, false)?;

        let branch = ReleaseBranch::for_version(&version);
        repository.checkout(Some("HEAD~1"), Some(&branch.name))?;
        repository.push(RemoteKind::Upstream, &branch.name, false)?;

        info!("Release branch created: {}", branch.name);
        Ok(branch)
    }
}
