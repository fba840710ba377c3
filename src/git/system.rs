use crate::command::{output_lines, CommandRunner};
use crate::config::{Config, Protocol, RepositoryConfig};
use crate::error::{ReleaseError, Result};
use crate::git::{args, RemoteKind, Repository};
use git2::{BranchType, ErrorCode, Status, StatusOptions};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A real checkout on disk
pub struct GitRepository {
    directory: PathBuf,
    upstream_name: String,
    origin_name: String,
    git: CommandRunner,
    repo: git2::Repository,
}

impl GitRepository {
    /// Open the configured checkout, cloning it first when
    /// `initialize_from_remote` is set
    pub fn open(config: &Config) -> Result<Self> {
        let repository = &config.repository;
        let directory = match &repository.directory {
            Some(directory) => directory.clone(),
            None => std::env::current_dir()?,
        };
        let environment = git_environment(config.git.ssh_key_file.as_deref())?;

        if repository.initialize_from_remote {
            clone_from_remote(repository, &config.git.executable, &environment, &directory)?;
        }

        validate_directory(&directory, repository)?;

        let repo = git2::Repository::open(&directory)?;
        let git = CommandRunner::new(&config.git.executable, environment, &directory);

        debug!(directory = %directory.display(), "opened repository");
        Ok(GitRepository {
            directory,
            upstream_name: repository.upstream_name.clone(),
            origin_name: repository.origin_name.clone(),
            git,
            repo,
        })
    }

    fn run(&self, arguments: Vec<String>) -> Result<String> {
        self.git.run(&arguments)
    }
}

impl Repository for GitRepository {
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
        let mut options = StatusOptions::new();
        options.include_untracked(true).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .filter(|entry| entry.status() != Status::CURRENT)
            .map(|entry| {
                format!(
                    "{} {}",
                    short_status(entry.status()),
                    entry.path().unwrap_or("(non-utf8 path)")
                )
            })
            .collect())
    }

    fn add(&self, path: &str) -> Result<()> {
        self.run(args::add(path)).map(|_| ())
    }

    fn checkout(&self, reference: Option<&str>, new_branch: Option<&str>) -> Result<()> {
        self.run(args::checkout(reference, new_branch)).map(|_| ())
    }

    fn commit(&self, title: &str) -> Result<()> {
        self.run(args::commit(title)).map(|_| ())
    }

    fn fast_forward_upstream(&self, reference: &str) -> Result<()> {
        self.run(args::fast_forward(&self.upstream_name, reference))
            .map(|_| ())
    }

    fn fetch_upstream(&self, reference: Option<&str>) -> Result<()> {
        self.run(args::fetch(&self.upstream_name, reference))
            .map(|_| ())
    }

    fn list_upstream_heads(&self, branch: &str) -> Result<Vec<String>> {
        let output = self.run(args::list_heads(&self.upstream_name, branch))?;
        Ok(output_lines(&output))
    }

    fn log(&self, revision_range: &str, options: &[&str]) -> Result<String> {
        self.run(args::log(revision_range, options))
    }

    fn push(&self, remote: RemoteKind, branch: &str, include_tags: bool) -> Result<()> {
        let remote = self.remote_name(remote).to_string();
        self.run(args::push(&remote, branch, include_tags))
            .map(|_| ())
    }

    fn tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;
        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn delete_local_branch(&self, name: &str) -> Result<()> {
        match self.repo.find_branch(name, BranchType::Local) {
            Ok(mut branch) => {
                branch.delete()?;
                debug!(branch = name, "deleted local branch");
                Ok(())
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn remote_url(&self, remote_name: &str) -> Result<String> {
        let remote = self.repo.find_remote(remote_name)?;
        remote.url().map(str::to_string).ok_or_else(|| {
            ReleaseError::config(format!("Remote {} has no valid url", remote_name))
        })
    }
}

/// Environment for every git invocation; an ssh key selects the identity
fn git_environment(ssh_key_file: Option<&Path>) -> Result<HashMap<String, String>> {
    let mut environment = HashMap::new();
    if let Some(key) = ssh_key_file {
        if !key.is_file() {
            return Err(ReleaseError::config(format!(
                "SSH key file does not exist: {}",
                key.display()
            )));
        }
        environment.insert(
            "GIT_SSH_COMMAND".to_string(),
            format!(
                "ssh -i {} -o IdentitiesOnly=yes",
                shell_quote(&key.display().to_string())
            ),
        );
    }
    Ok(environment)
}

/// Single-quote `value` for the shell git runs `GIT_SSH_COMMAND` through
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn validate_directory(directory: &Path, repository: &RepositoryConfig) -> Result<()> {
    if !directory.exists() {
        return Err(ReleaseError::config(format!(
            "Directory does not exist: {}",
            directory.display()
        )));
    }
    if !directory.is_dir() {
        return Err(ReleaseError::config(format!(
            "File is not a directory: {}",
            directory.display()
        )));
    }
    if repository.check_directory_name {
        let name = directory
            .canonicalize()?
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        if name.as_deref() != Some(repository.name.as_str()) {
            return Err(ReleaseError::config(format!(
                "Directory name must be {}: {}",
                repository.name,
                directory.display()
            )));
        }
    }
    Ok(())
}

/// URL of a GitHub repository for the configured transport
pub fn github_url(repository: &str, protocol: Protocol, access_token: Option<&str>) -> String {
    match (protocol, access_token) {
        (Protocol::Ssh, _) => format!("git@github.com:{}.git", repository),
        (Protocol::Https, Some(token)) => format!("https://{}@github.com/{}.git", token, repository),
        (Protocol::Https, None) => format!("https://github.com/{}.git", repository),
    }
}

fn clone_from_remote(
    repository: &RepositoryConfig,
    executable: &str,
    environment: &HashMap<String, String>,
    directory: &Path,
) -> Result<()> {
    let upstream = repository.upstream_repository.as_deref().ok_or_else(|| {
        ReleaseError::config("upstream_repository is required to initialize from remote")
    })?;
    let origin = repository.origin_repository.as_deref().unwrap_or(upstream);

    if directory.exists() && fs::read_dir(directory)?.next().is_some() {
        return Err(ReleaseError::config(format!(
            "Cannot initialize from remote, directory is not empty: {}",
            directory.display()
        )));
    }
    let parent = match directory.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    fs::create_dir_all(&parent)?;

    let token = repository.access_token.as_deref();
    let origin_url = github_url(origin, repository.protocol, token);
    let upstream_url = github_url(upstream, repository.protocol, token);

    info!("Cloning {} into {}", origin, directory.display());
    let target = directory.to_string_lossy().into_owned();
    CommandRunner::new(executable, environment.clone(), parent).run(&args::clone(
        &repository.origin_name,
        &origin_url,
        &target,
    ))?;

    let git = CommandRunner::new(executable, environment.clone(), directory);
    git.run(&args::add_remote(&repository.upstream_name, &upstream_url))?;
    git.run(&args::fetch(&repository.upstream_name, None))?;
    Ok(())
}

fn short_status(status: Status) -> &'static str {
    if status.is_wt_new() {
        "??"
    } else if status.is_index_new() {
        "A"
    } else if status.is_index_deleted() || status.is_wt_deleted() {
        "D"
    } else if status.is_index_renamed() || status.is_wt_renamed() {
        "R"
    } else if status.is_conflicted() {
        "UU"
    } else {
        "M"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(directory: &Path) -> Config {
        let mut config = Config::default();
        config.repository.directory = Some(directory.to_path_buf());
        config.repository.check_directory_name = false;
        config
    }

    #[test]
    fn test_open_reports_status_and_tags() {
        let dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        let signature = git2::Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let commit = repo
            .commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
            .unwrap();
        let object = repo.find_object(commit, None).unwrap();
        repo.tag_lightweight("0.231", &object, false).unwrap();

        let git = GitRepository::open(&config_for(dir.path())).unwrap();
        assert!(git.status().unwrap().is_empty());
        assert_eq!(git.tags().unwrap(), vec!["0.231"]);

        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        assert_eq!(git.status().unwrap(), vec!["?? pom.xml"]);
    }

    #[test]
    fn test_delete_missing_branch_is_ignored() {
        let dir = TempDir::new().unwrap();
        git2::Repository::init(dir.path()).unwrap();
        let git = GitRepository::open(&config_for(dir.path())).unwrap();
        assert!(git.delete_local_branch("release-0.231").is_ok());
    }

    #[test]
    fn test_remote_url() {
        let dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        repo.remote("upstream", "https://github.com/prestodb/presto.git")
            .unwrap();

        let git = GitRepository::open(&config_for(dir.path())).unwrap();
        assert_eq!(
            git.remote_url("upstream").unwrap(),
            "https://github.com/prestodb/presto.git"
        );
        assert!(git.remote_url("origin").is_err());
    }

    #[test]
    fn test_directory_name_is_checked() {
        let dir = TempDir::new().unwrap();
        git2::Repository::init(dir.path()).unwrap();
        let mut config = config_for(dir.path());
        config.repository.check_directory_name = true;

        let err = GitRepository::open(&config).err().unwrap();
        assert!(err.to_string().contains("Directory name must be presto"));
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir.path().join("missing"));
        let err = GitRepository::open(&config).err().unwrap();
        assert!(err.to_string().contains("Directory does not exist"));
    }

    #[test]
    fn test_missing_ssh_key() {
        let err = git_environment(Some(Path::new("/nonexistent/id_rsa"))).unwrap_err();
        assert!(err.to_string().contains("SSH key file does not exist"));
        assert!(git_environment(None).unwrap().is_empty());
    }

    #[test]
    fn test_ssh_key_path_is_quoted() {
        let dir = TempDir::new().unwrap();
        let key = dir.path().join("my keys").join("id_rsa");
        fs::create_dir_all(key.parent().unwrap()).unwrap();
        fs::write(&key, "key").unwrap();

        let environment = git_environment(Some(&key)).unwrap();
        assert_eq!(
            environment["GIT_SSH_COMMAND"],
            format!("ssh -i '{}' -o IdentitiesOnly=yes", key.display())
        );
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn test_github_url() {
        assert_eq!(
            github_url("prestodb/presto", Protocol::Ssh, Some("t")),
            "git@github.com:prestodb/presto.git"
        );
        assert_eq!(
            github_url("prestodb/presto", Protocol::Https, Some("t")),
            "https://t@github.com/prestodb/presto.git"
        );
        assert_eq!(
            github_url("prestodb/presto", Protocol::Https, None),
            "https://github.com/prestodb/presto.git"
        );
    }
}
