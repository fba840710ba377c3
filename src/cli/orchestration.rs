//! Main workflow orchestration logic
//!
//! Builds the real git, maven and GitHub implementations from the
//! configuration and runs one workflow with them. Kept apart from `main`
//! so the wiring can be called without going through clap.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::build::MavenCommands;
use crate::config::{CliOverrides, Config};
use crate::domain::{PullRequest, ReleaseBranch, Version};
use crate::git::{GitRepository, Repository};
use crate::github::GithubGraphQl;
use crate::notes::{GenerateReleaseNotes, ReleaseNoteItem, ReleaseNotesChecker};
use crate::release::{CutRelease, FinalizeRelease, NoManifestEdits};

/// Load the configuration file and apply command-line overrides on top
pub fn load_config(path: Option<&Path>, overrides: &CliOverrides) -> Result<Config> {
    let mut config = Config::load(path).context("Failed to load configuration")?;
    config.apply(overrides);
    Ok(config)
}

pub fn open_repository(config: &Config) -> Result<GitRepository> {
    GitRepository::open(config).context("Failed to open repository")
}

pub fn cut_release(
    config: &Config,
    repository: &dyn Repository,
    version: Option<Version>,
) -> Result<ReleaseBranch> {
    let maven = MavenCommands::new(&config.maven, repository.directory());
    let branch = CutRelease::new(
        repository,
        &maven,
        &NoManifestEdits,
        &config.repository.trunk_branch,
    )
    .expect_version(version)
    .run()?;
    Ok(branch)
}

pub fn finalize_release(
    config: &Config,
    repository: &dyn Repository,
    version: Option<Version>,
) -> Result<Version> {
    let maven = MavenCommands::new(&config.maven, repository.directory());
    let version = FinalizeRelease::new(
        repository,
        &maven,
        &NoManifestEdits,
        &config.repository.trunk_branch,
    )
    .with_version(version)
    .run()?;
    Ok(version)
}

pub fn release_notes(
    config: &Config,
    repository: &dyn Repository,
    version: Option<Version>,
) -> Result<PullRequest> {
    let github = GithubGraphQl::new(&config.github).context("Failed to create GitHub client")?;
    let pull_request = GenerateReleaseNotes::new(
        repository,
        &github,
        &config.release_notes,
        &config.repository.trunk_branch,
    )
    .with_version(version)
    .run()?;
    Ok(pull_request)
}

/// Validate a pull request description read from `input`
pub fn check_release_notes<R: Read>(mut input: R) -> crate::error::Result<Vec<ReleaseNoteItem>> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    let description = String::from_utf8_lossy(&bytes);
    ReleaseNotesChecker::new()?.check(&description)
}
