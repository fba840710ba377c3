use crate::config::ReleaseNotesConfig;
use crate::command::output_lines;
use crate::domain::{release_notes_branch, PomFile, PullRequest, ReleaseBranch, Version};
use crate::error::{ReleaseError, Result};
use crate::git::{repository_from_url, RemoteKind, Repository};
use crate::github::GithubClient;
use crate::notes::document::ReleaseNotes;
use crate::notes::extract::ReleaseNoteExtractor;
use crate::release::sanitize_repository;
use chrono::{Local, NaiveDate};
use std::fs;
use tracing::info;

/// Collect the notes of a release from GitHub and open a pull request
/// adding them to the documentation
pub struct GenerateReleaseNotes<'a> {
    repository: &'a dyn Repository,
    github: &'a dyn GithubClient,
    config: &'a ReleaseNotesConfig,
    trunk: String,
    version: Option<Version>,
    date: Option<NaiveDate>,
}

impl<'a> GenerateReleaseNotes<'a> {
    pub fn new(
        repository: &'a dyn Repository,
        github: &'a dyn GithubClient,
        config: &'a ReleaseNotesConfig,
        trunk: impl Into<String>,
    ) -> Self {
        GenerateReleaseNotes {
            repository,
            github,
            config,
            trunk: trunk.into(),
            version: None,
            date: None,
        }
    }

    /// Defaults to the release preceding trunk
    pub fn with_version(mut self, version: Option<Version>) -> Self {
        self.version = version;
        self
    }

    /// Release date written to the index, defaults to today
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Returns the opened pull request
    pub fn run(&self) -> Result<PullRequest> {
        let repository = self.repository;
        sanitize_repository(repository, &self.trunk)?;

        let version = match self.version {
            Some(version) => version,
            None => PomFile::in_directory(repository.directory())?
                .version()?
                .last_major_version()?,
        };
        let previous = version.last_major_version()?;

        let upstream = repository.upstream_name().to_string();
        let upstream_url = repository.remote_url(&upstream)?;
        let upstream_repository = repository_from_url(&upstream_url)?;
        info!("upstream url: {}, repo: {}", upstream_url, upstream_repository);
        info!("Release version: {}, Last Version: {}", version, previous);

        let release_branch = ReleaseBranch::for_version(&version);
        let range = format!(
            "{}..{}",
            ReleaseBranch::for_version(&previous).remote_ref(&upstream),
            release_branch.remote_ref(&upstream)
        );
        let commit_ids = output_lines(&repository.log(&range, &["--format=%H", "--date-order"])?);
        let earliest = commit_ids
            .last()
            .ok_or_else(|| ReleaseError::NoCommits(range.clone()))?;

        info!("Fetching Github commits");
        let commits =
            self.github
                .list_commits(&upstream_repository, &release_branch.name, earliest)?;
        info!("Fetched {} commits", commits.len());

        let extractor = ReleaseNoteExtractor::new()?;
        let notes = ReleaseNotes::collect(&extractor, commits)?;
        info!("Processing {} commits", notes.commits().len());

        let document = notes.document(&version, self.config);
        let summary = notes.summary();

        let branch = release_notes_branch(&version);
        self.write_release_notes(&version, &branch, &document)?;
        repository.push(RemoteKind::Origin, &branch, false)?;

        let origin_url = repository.remote_url(repository.origin_name())?;
        let origin_repository = repository_from_url(&origin_url)?;
        info!("origin url: {}, repo: {}", origin_url, origin_repository);
        let origin_owner = origin_repository.split('/').next().unwrap_or_default();

        let pull_request = self.github.create_pull_request(
            &upstream_repository,
            &self.trunk,
            &format!("{}:{}", origin_owner, branch),
            &format!("Add release notes for {}", version),
            &summary,
        )?;
        info!("Release notes pull request created: {}", pull_request.url);
        Ok(pull_request)
    }

    fn write_release_notes(&self, version: &Version, branch: &str, document: &str) -> Result<()> {
        let repository = self.repository;
        repository.checkout(None, Some(branch))?;

        let directory = repository.directory();
        let notes_file = directory.join(self.config.notes_file_for(&version.to_string()));
        if let Some(parent) = notes_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&notes_file, document)?;

        let index_file = directory.join(&self.config.index_file);
        let index = fs::read_to_string(&index_file)?;
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let updated = insert_index_entry(&index, self.config.index_line, version, date)?;
        fs::write(&index_file, updated)?;

        repository.add(".")?;
        repository.commit(&format!("Add release notes for {}", version))
    }
}

/// Insert the entry for `version` at zero-based `line` of the index
pub fn insert_index_entry(
    index: &str,
    line: usize,
    version: &Version,
    date: NaiveDate,
) -> Result<String> {
    let mut lines: Vec<String> = index.lines().map(str::to_string).collect();
    if line > lines.len() {
        return Err(ReleaseError::config(format!(
            "Release notes index has {} lines, cannot insert at line {}",
            lines.len(),
            line
        )));
    }
    lines.insert(
        line,
        format!(
            "    Release-{} [{}] <release/release-{}>",
            version,
            date.format("%Y-%m-%d"),
            version
        ),
    );
    Ok(format!("{}\n", lines.join("\n")))
}
