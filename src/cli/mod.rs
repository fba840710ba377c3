//! Command-line surface
//!
//! Flags are parsed into plain structs and turned into a [CliOverrides]
//! that is applied on top of the loaded configuration.

pub mod orchestration;

use crate::config::{CliOverrides, Protocol};
use crate::domain::Version;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "release-tools",
    version,
    about = "Cut and finalize releases, and manage release notes"
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log every external command")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the release branch and move trunk to the next development version
    CutRelease(ReleaseArgs),

    /// Tag and publish a release from its release branch
    FinalizeRelease(ReleaseArgs),

    /// Generate the release notes and open a pull request with them
    ReleaseNotes(ReleaseNotesArgs),

    /// Validate the release notes of a pull request description read from stdin
    CheckReleaseNotes,
}

#[derive(Args, Debug, Clone)]
pub struct ReleaseArgs {
    #[arg(long, value_parser = parse_version, help = "Expected release version, e.g. 0.231 or 0.231.1")]
    pub release_version: Option<Version>,

    #[arg(short, long, help = "Skip confirmation prompts")]
    pub yes: bool,

    #[command(flatten)]
    pub repository: RepositoryArgs,

    #[command(flatten)]
    pub maven: MavenArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ReleaseNotesArgs {
    #[arg(
        long = "release-version",
        alias = "version",
        value_parser = parse_version,
        help = "Release to collect notes for, defaults to the release preceding trunk"
    )]
    pub release_version: Option<Version>,

    #[command(flatten)]
    pub repository: RepositoryArgs,

    #[command(flatten)]
    pub github: GithubArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RepositoryArgs {
    #[arg(long, help = "Project checkout, defaults to the current directory")]
    pub directory: Option<PathBuf>,

    #[arg(long)]
    pub upstream_name: Option<String>,

    #[arg(long)]
    pub origin_name: Option<String>,

    #[arg(long, help = "Do not require the checkout directory to carry the repository name")]
    pub skip_directory_check: bool,

    #[arg(long, help = "Clone the checkout from GitHub first")]
    pub initialize_from_remote: bool,

    #[arg(long, help = "Upstream repository as owner/name")]
    pub upstream_repository: Option<String>,

    #[arg(long, help = "Origin repository as owner/name")]
    pub origin_repository: Option<String>,

    #[arg(long, value_parser = parse_protocol)]
    pub protocol: Option<Protocol>,

    #[arg(long, hide_env_values = true, env = "RELEASE_TOOLS_REPOSITORY_TOKEN")]
    pub repository_access_token: Option<String>,

    #[arg(long)]
    pub git_executable: Option<String>,

    #[arg(long)]
    pub ssh_key_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MavenArgs {
    #[arg(long)]
    pub maven_executable: Option<String>,

    #[arg(long = "maven-option", allow_hyphen_values = true, help = "Option passed to every maven invocation")]
    pub maven_options: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GithubArgs {
    #[arg(long)]
    pub github_user: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_access_token: Option<String>,
}

fn parse_version(value: &str) -> Result<Version, String> {
    Version::parse_release(value).map_err(|e| e.to_string())
}

fn parse_protocol(value: &str) -> Result<Protocol, String> {
    value.parse().map_err(|e: crate::error::ReleaseError| e.to_string())
}

impl RepositoryArgs {
    fn apply_to(&self, overrides: &mut CliOverrides) {
        overrides.directory = self.directory.clone();
        overrides.upstream_name = self.upstream_name.clone();
        overrides.origin_name = self.origin_name.clone();
        if self.skip_directory_check {
            overrides.check_directory_name = Some(false);
        }
        if self.initialize_from_remote {
            overrides.initialize_from_remote = Some(true);
        }
        overrides.upstream_repository = self.upstream_repository.clone();
        overrides.origin_repository = self.origin_repository.clone();
        overrides.protocol = self.protocol;
        overrides.repository_access_token = self.repository_access_token.clone();
        overrides.git_executable = self.git_executable.clone();
        overrides.ssh_key_file = self.ssh_key_file.clone();
    }
}

impl Command {
    /// Flags of this command that replace configuration values
    pub fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides::default();
        match self {
            Command::CutRelease(args) | Command::FinalizeRelease(args) => {
                args.repository.apply_to(&mut overrides);
                overrides.maven_executable = args.maven.maven_executable.clone();
                if !args.maven.maven_options.is_empty() {
                    overrides.maven_options = Some(args.maven.maven_options.clone());
                }
            }
            Command::ReleaseNotes(args) => {
                args.repository.apply_to(&mut overrides);
                overrides.github_user = args.github.github_user.clone();
                overrides.github_access_token = args.github.github_access_token.clone();
            }
            Command::CheckReleaseNotes => {}
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cut_release() {
        let cli = Cli::try_parse_from([
            "release-tools",
            "cut-release",
            "--release-version",
            "0.232",
            "--skip-directory-check",
            "--maven-option",
            "-B",
            "--maven-option",
            "-DskipTests",
        ])
        .unwrap();

        let Command::CutRelease(args) = &cli.command else {
            panic!("expected cut-release");
        };
        assert_eq!(args.release_version, Some(Version::parse_release("0.232").unwrap()));

        let overrides = cli.command.overrides();
        assert_eq!(overrides.check_directory_name, Some(false));
        assert_eq!(
            overrides.maven_options,
            Some(vec!["-B".to_string(), "-DskipTests".to_string()])
        );
        assert_eq!(overrides.initialize_from_remote, None);
    }

    #[test]
    fn test_invalid_version_is_rejected() {
        assert!(Cli::try_parse_from(["release-tools", "finalize-release", "--release-version", "0.0"]).is_err());
        assert!(Cli::try_parse_from(["release-tools", "finalize-release", "--release-version", "231"]).is_err());
    }

    #[test]
    fn test_release_notes_version_alias() {
        let cli = Cli::try_parse_from(["release-tools", "release-notes", "--version", "0.231"]).unwrap();
        let Command::ReleaseNotes(args) = &cli.command else {
            panic!("expected release-notes");
        };
        assert_eq!(args.release_version.unwrap().to_string(), "0.231");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["release-tools", "check-release-notes", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.command.overrides() == CliOverrides::default());
    }
}
