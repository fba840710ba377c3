use crate::build::BuildTool;
use crate::domain::{PomFile, ReleaseBranch, Version};
use crate::error::Result;
use crate::git::{RemoteKind, Repository};
use crate::release::{check_release_cut, check_tags, check_version, sanitize_repository, ManifestHook};
use tracing::{debug, info};

/// Tag and publish a release from its already-cut branch
pub struct FinalizeRelease<'a> {
    repository: &'a dyn Repository,
    build: &'a dyn BuildTool,
    hook: &'a dyn ManifestHook,
    trunk: String,
    version: Option<Version>,
}

impl<'a> FinalizeRelease<'a> {
    pub fn new(
        repository: &'a dyn Repository,
        build: &'a dyn BuildTool,
        hook: &'a dyn ManifestHook,
        trunk: impl Into<String>,
    ) -> Self {
        FinalizeRelease {
            repository,
            build,
            hook,
            trunk: trunk.into(),
            version: None,
        }
    }

    /// Release `version` instead of the one preceding trunk; a hot-fix
    /// version selects its major version's branch
    pub fn with_version(mut self, version: Option<Version>) -> Self {
        self.version = version;
        self
    }

    /// Returns the released version
    pub fn run(&self) -> Result<Version> {
        let repository = self.repository;
        sanitize_repository(repository, &self.trunk)?;

        let trunk_release = PomFile::in_directory(repository.directory())?
            .version()?
            .last_major_version()?;
        let version = match self.version {
            Some(version) => {
                if !version.is_hot_fix() {
                    check_version(&version, &trunk_release)?;
                }
                version
            }
            None => trunk_release,
        };
        let major = version.major_version();
        let development = version.next_minor_version()?;
        check_tags(repository, &version)?;
        check_release_cut(repository, &major)?;

        let branch = ReleaseBranch::for_version(&major);
        if let Err(e) = repository.delete_local_branch(&branch.name) {
            debug!(branch = %branch.name, error = %e, "local release branch not deleted");
        }
        repository.checkout(
            Some(&branch.remote_ref(repository.upstream_name())),
            Some(&branch.name),
        )?;

        let pom = PomFile::in_directory(repository.directory())?;
        if version.is_hot_fix() {
            check_version(&version, &pom.version()?)?;
        }

        self.hook.before_prepare(&pom, &version)?;
        self.build.release_prepare(
            &version.release_string(),
            &development.snapshot_string(),
            &version.release_string(),
        )?;
        self.build.release_clean()?;
        self.hook.after_prepare(&pom, &version)?;

        repository.push(RemoteKind::Upstream, &branch.name, true)?;

        info!("Release finalized: {}", version);
        Ok(version)
    }
}
