use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "release-tools.toml";

/// Represents the complete configuration for release-tools.
///
/// Every section has defaults matching the conventional layout of the
/// project being released, so an empty file (or no file) is valid.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub maven: MavenConfig,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub release_notes: ReleaseNotesConfig,
}

/// Transport used when cloning from GitHub
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Https,
    Ssh,
}

impl std::str::FromStr for Protocol {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "https" => Ok(Protocol::Https),
            "ssh" => Ok(Protocol::Ssh),
            other => Err(ReleaseError::config(format!(
                "Invalid protocol: {}, expect https or ssh",
                other
            ))),
        }
    }
}

fn default_repository_name() -> String {
    "presto".to_string()
}

fn default_upstream_name() -> String {
    "upstream".to_string()
}

fn default_origin_name() -> String {
    "origin".to_string()
}

fn default_trunk_branch() -> String {
    "master".to_string()
}

fn default_true() -> bool {
    true
}

/// Where the project checkout lives and how its remotes are named.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryConfig {
    /// Repository name; the checkout directory must carry it when
    /// `check_directory_name` is set
    #[serde(default = "default_repository_name")]
    pub name: String,

    #[serde(default = "default_upstream_name")]
    pub upstream_name: String,

    #[serde(default = "default_origin_name")]
    pub origin_name: String,

    #[serde(default = "default_trunk_branch")]
    pub trunk_branch: String,

    /// Checkout directory, defaults to the current directory
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub check_directory_name: bool,

    /// Clone the checkout from GitHub instead of using an existing one
    #[serde(default)]
    pub initialize_from_remote: bool,

    /// `<owner>/<repo>` of upstream, required when initializing from remote
    #[serde(default)]
    pub upstream_repository: Option<String>,

    /// `<owner>/<repo>` of origin, defaults to upstream
    #[serde(default)]
    pub origin_repository: Option<String>,

    #[serde(default)]
    pub protocol: Protocol,

    /// Token embedded in https clone URLs
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            name: default_repository_name(),
            upstream_name: default_upstream_name(),
            origin_name: default_origin_name(),
            trunk_branch: default_trunk_branch(),
            directory: None,
            check_directory_name: true,
            initialize_from_remote: false,
            upstream_repository: None,
            origin_repository: None,
            protocol: Protocol::Https,
            access_token: None,
        }
    }
}

fn default_git_executable() -> String {
    "git".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_git_executable")]
    pub executable: String,

    /// Private key passed to ssh through `GIT_SSH_COMMAND`
    #[serde(default)]
    pub ssh_key_file: Option<PathBuf>,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            executable: default_git_executable(),
            ssh_key_file: None,
        }
    }
}

fn default_maven_executable() -> String {
    "mvn".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MavenConfig {
    #[serde(default = "default_maven_executable")]
    pub executable: String,

    /// Options placed before every goal (e.g. `-B`, `-DskipTests`)
    #[serde(default)]
    pub options: Vec<String>,
}

impl Default for MavenConfig {
    fn default() -> Self {
        MavenConfig {
            executable: default_maven_executable(),
            options: Vec::new(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com/graphql".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GithubConfig {
    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            user: None,
            access_token: None,
            api_url: default_api_url(),
        }
    }
}

impl GithubConfig {
    /// Configured token, else `GITHUB_TOKEN` from the environment
    pub fn resolve_access_token(&self) -> Result<String> {
        if let Some(token) = self.access_token.as_ref().filter(|t| !t.is_empty()) {
            return Ok(token.clone());
        }
        std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ReleaseError::config("GitHub access token is not set (github.access_token or GITHUB_TOKEN)")
            })
    }
}

fn default_notes_file() -> String {
    "presto-docs/src/main/sphinx/release/release-{version}.rst".to_string()
}

fn default_index_file() -> String {
    "presto-docs/src/main/sphinx/release.rst".to_string()
}

fn default_index_line() -> usize {
    7
}

fn default_pull_request_url() -> String {
    "https://github.com/prestodb/presto/pull/{id}".to_string()
}

/// Locations of the generated release-notes documents.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseNotesConfig {
    /// Path of the per-release document, relative to the checkout; `{version}` is substituted
    #[serde(default = "default_notes_file")]
    pub notes_file: String,

    /// Path of the document listing all releases
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Zero-based line at which new index entries are inserted
    #[serde(default = "default_index_line")]
    pub index_line: usize,

    /// Link rendered for each note; `{id}` is substituted
    #[serde(default = "default_pull_request_url")]
    pub pull_request_url: String,
}

impl Default for ReleaseNotesConfig {
    fn default() -> Self {
        ReleaseNotesConfig {
            notes_file: default_notes_file(),
            index_file: default_index_file(),
            index_line: default_index_line(),
            pull_request_url: default_pull_request_url(),
        }
    }
}

impl ReleaseNotesConfig {
    pub fn notes_file_for(&self, version: &str) -> String {
        self.notes_file.replace("{version}", version)
    }

    pub fn pull_request_url_for(&self, id: u64) -> String {
        self.pull_request_url.replace("{id}", &id.to_string())
    }
}

/// Values given on the command line; each one present replaces the file value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub directory: Option<PathBuf>,
    pub upstream_name: Option<String>,
    pub origin_name: Option<String>,
    pub check_directory_name: Option<bool>,
    pub initialize_from_remote: Option<bool>,
    pub upstream_repository: Option<String>,
    pub origin_repository: Option<String>,
    pub protocol: Option<Protocol>,
    pub repository_access_token: Option<String>,
    pub git_executable: Option<String>,
    pub ssh_key_file: Option<PathBuf>,
    pub maven_executable: Option<String>,
    pub maven_options: Option<Vec<String>>,
    pub github_user: Option<String>,
    pub github_access_token: Option<String>,
}

impl Config {
    /// Loads configuration from file or returns defaults.
    ///
    /// Lookup order:
    /// 1. Custom path provided as parameter
    /// 2. `release-tools.toml` in current directory
    /// 3. `release-tools.toml` in the user config directory
    /// 4. Default configuration if no file found
    pub fn load(config_path: Option<&Path>) -> Result<Config> {
        let config_str = if let Some(path) = config_path {
            fs::read_to_string(path).map_err(|e| {
                ReleaseError::config(format!("Cannot read {}: {}", path.display(), e))
            })?
        } else if Path::new(CONFIG_FILE_NAME).exists() {
            fs::read_to_string(CONFIG_FILE_NAME)?
        } else if let Some(path) = dirs::config_dir()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
        {
            fs::read_to_string(path)?
        } else {
            return Ok(Config::default());
        };

        Ok(toml::from_str(&config_str)?)
    }

    pub fn apply(&mut self, overrides: &CliOverrides) {
        let repository = &mut self.repository;
        if let Some(directory) = &overrides.directory {
            repository.directory = Some(directory.clone());
        }
        if let Some(name) = &overrides.upstream_name {
            repository.upstream_name = name.clone();
        }
        if let Some(name) = &overrides.origin_name {
            repository.origin_name = name.clone();
        }
        if let Some(check) = overrides.check_directory_name {
            repository.check_directory_name = check;
        }
        if let Some(initialize) = overrides.initialize_from_remote {
            repository.initialize_from_remote = initialize;
        }
        if let Some(upstream) = &overrides.upstream_repository {
            repository.upstream_repository = Some(upstream.clone());
        }
        if let Some(origin) = &overrides.origin_repository {
            repository.origin_repository = Some(origin.clone());
        }
        if let Some(protocol) = overrides.protocol {
            repository.protocol = protocol;
        }
        if let Some(token) = &overrides.repository_access_token {
            repository.access_token = Some(token.clone());
        }

        if let Some(executable) = &overrides.git_executable {
            self.git.executable = executable.clone();
        }
        if let Some(key) = &overrides.ssh_key_file {
            self.git.ssh_key_file = Some(key.clone());
        }
        if let Some(executable) = &overrides.maven_executable {
            self.maven.executable = executable.clone();
        }
        if let Some(options) = &overrides.maven_options {
            self.maven.options = options.clone();
        }
        if let Some(user) = &overrides.github_user {
            self.github.user = Some(user.clone());
        }
        if let Some(token) = &overrides.github_access_token {
            self.github.access_token = Some(token.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.repository.upstream_name, "upstream");
        assert_eq!(config.repository.origin_name, "origin");
        assert_eq!(config.repository.trunk_branch, "master");
        assert!(config.repository.check_directory_name);
        assert_eq!(config.git.executable, "git");
        assert_eq!(config.maven.executable, "mvn");
        assert_eq!(config.release_notes.index_line, 7);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[repository]
upstream_name = "prestodb"
protocol = "ssh"

[maven]
options = ["-B", "-DskipTests"]
"#,
        )
        .unwrap();

        assert_eq!(config.repository.upstream_name, "prestodb");
        assert_eq!(config.repository.origin_name, "origin");
        assert_eq!(config.repository.protocol, Protocol::Ssh);
        assert_eq!(config.maven.options, vec!["-B", "-DskipTests"]);
        assert_eq!(config.maven.executable, "mvn");
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = Config::default();
        config.apply(&CliOverrides {
            upstream_name: Some("up".to_string()),
            check_directory_name: Some(false),
            maven_options: Some(vec!["-q".to_string()]),
            ..CliOverrides::default()
        });

        assert_eq!(config.repository.upstream_name, "up");
        assert!(!config.repository.check_directory_name);
        assert_eq!(config.maven.options, vec!["-q"]);
        assert_eq!(config.repository.origin_name, "origin");
    }

    #[test]
    fn test_protocol_from_str() {
        assert_eq!("HTTPS".parse::<Protocol>().unwrap(), Protocol::Https);
        assert_eq!("ssh".parse::<Protocol>().unwrap(), Protocol::Ssh);
        assert!("ftp".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_release_notes_paths() {
        let notes = ReleaseNotesConfig::default();
        assert_eq!(
            notes.notes_file_for("0.231"),
            "presto-docs/src/main/sphinx/release/release-0.231.rst"
        );
        assert_eq!(
            notes.pull_request_url_for(14000),
            "https://github.com/prestodb/presto/pull/14000"
        );
    }

    #[test]
    #[serial]
    fn test_access_token_prefers_config() {
        std::env::set_var("GITHUB_TOKEN", "from-env");
        let github = GithubConfig {
            access_token: Some("from-config".to_string()),
            ..GithubConfig::default()
        };
        assert_eq!(github.resolve_access_token().unwrap(), "from-config");
        assert_eq!(
            GithubConfig::default().resolve_access_token().unwrap(),
            "from-env"
        );
        std::env::remove_var("GITHUB_TOKEN");
    }

    #[test]
    #[serial]
    fn test_access_token_missing() {
        std::env::remove_var("GITHUB_TOKEN");
        assert!(GithubConfig::default().resolve_access_token().is_err());
    }
}
