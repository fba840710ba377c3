use crate::command::CommandLog;
use crate::error::{ReleaseError, Result};
use crate::git::{args, RemoteKind, Repository};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Side effect run when a checkout is recorded, e.g. rewriting the manifest
/// to what the checked-out branch would contain
pub type CheckoutAction = Box<dyn Fn(Option<&str>, Option<&str>, &Path) -> Result<()>>;

/// Mock repository for testing without actual git operations
///
/// Every call is rendered as the `git` command the real repository would
/// run and appended to a [CommandLog], which may be shared with the other
/// test doubles to assert on the full command sequence.
pub struct MockRepository {
    directory: PathBuf,
    upstream_name: String,
    origin_name: String,
    log: CommandLog,
    status: Vec<String>,
    tags: BTreeSet<String>,
    upstream_heads: BTreeSet<String>,
    log_outputs: HashMap<String, String>,
    remote_urls: HashMap<String, String>,
    checkout_action: Option<CheckoutAction>,
    failing_commands: Vec<String>,
}

impl MockRepository {
    /// Create a clean mock checkout rooted at `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        MockRepository {
            directory: directory.into(),
            upstream_name: "upstream".to_string(),
            origin_name: "origin".to_string(),
            log: CommandLog::new(),
            status: Vec::new(),
            tags: BTreeSet::new(),
            upstream_heads: BTreeSet::new(),
            log_outputs: HashMap::new(),
            remote_urls: HashMap::new(),
            checkout_action: None,
            failing_commands: Vec::new(),
        }
    }

    /// Record into `log` instead of a private log
    pub fn with_command_log(mut self, log: CommandLog) -> Self {
        self.log = log;
        self
    }

    pub fn with_remote_names(mut self, upstream: &str, origin: &str) -> Self {
        self.upstream_name = upstream.to_string();
        self.origin_name = origin.to_string();
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.log.commands()
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    /// Make `branch` exist on upstream
    pub fn add_upstream_head(&mut self, branch: impl Into<String>) {
        self.upstream_heads.insert(branch.into());
    }

    pub fn set_status(&mut self, lines: Vec<String>) {
        self.status = lines;
    }

    /// Output returned by `log` for `revision_range`
    pub fn set_log_output(&mut self, revision_range: impl Into<String>, output: impl Into<String>) {
        self.log_outputs.insert(revision_range.into(), output.into());
    }

    pub fn set_remote_url(&mut self, remote: impl Into<String>, url: impl Into<String>) {
        self.remote_urls.insert(remote.into(), url.into());
    }

    pub fn set_checkout_action(&mut self, action: CheckoutAction) {
        self.checkout_action = Some(action);
    }

    /// Fail every command whose rendering starts with `prefix`
    pub fn fail_on(&mut self, prefix: impl Into<String>) {
        self.failing_commands.push(prefix.into());
    }

    fn record(&self, arguments: Vec<String>) -> Result<()> {
        self.log.log("git", &arguments);
        let rendered = crate::command::format_command("git", &arguments);
        if self
            .failing_commands
            .iter()
            .any(|prefix| rendered.starts_with(prefix.as_str()))
        {
            return Err(ReleaseError::CommandFailed {
                command: rendered,
                status: 1,
                stderr: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Repository for MockRepository {
    fn directory(&self) -> &Path {
        &self.directory
    }

    fn upstream_name(&self) -> &str {
        &self.upstream_name
    }

    fn origin_name(&self) -> &str {
        &self.origin_name
    }

    fn status(&self) -> Result<Vec<String>> {
        self.record(args::status())?;
        Ok(self.status.clone())
    }

    fn add(&self, path: &str) -> Result<()> {
        self.record(args::add(path))
    }

    fn checkout(&self, reference: Option<&str>, new_branch: Option<&str>) -> Result<()> {
        self.record(args::checkout(reference, new_branch))?;
        match &self.checkout_action {
            Some(action) => action(reference, new_branch, &self.directory),
            None => Ok(()),
        }
    }

    fn commit(&self, title: &str) -> Result<()> {
        self.record(args::commit(title))
    }

    fn fast_forward_upstream(&self, reference: &str) -> Result<()> {
        self.record(args::fast_forward(&self.upstream_name, reference))
    }

    fn fetch_upstream(&self, reference: Option<&str>) -> Result<()> {
        self.record(args::fetch(&self.upstream_name, reference))
    }

    fn list_upstream_heads(&self, branch: &str) -> Result<Vec<String>> {
        self.record(args::list_heads(&self.upstream_name, branch))?;
        Ok(self
            .upstream_heads
            .iter()
            .filter(|head| head.as_str() == branch)
            .map(|head| format!("0000000000000000000000000000000000000000\trefs/heads/{}", head))
            .collect())
    }

    fn log(&self, revision_range: &str, options: &[&str]) -> Result<String> {
        self.record(args::log(revision_range, options))?;
        Ok(self
            .log_outputs
            .get(revision_range)
            .cloned()
            .unwrap_or_default())
    }

    fn push(&self, remote: RemoteKind, branch: &str, include_tags: bool) -> Result<()> {
        self.record(args::push(self.remote_name(remote), branch, include_tags))
    }

    fn tags(&self) -> Result<Vec<String>> {
        self.record(args::tag())?;
        Ok(self.tags.iter().cloned().collect())
    }

    fn delete_local_branch(&self, name: &str) -> Result<()> {
        self.record(args::delete_branch(name))
    }

    fn remote_url(&self, remote_name: &str) -> Result<String> {
        self.record(args::remote_url(remote_name))?;
        self.remote_urls.get(remote_name).cloned().ok_or_else(|| {
            ReleaseError::config(format!("Remote {} has no valid url", remote_name))
        })
    }
}
