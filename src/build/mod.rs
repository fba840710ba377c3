//! Build-tool abstraction
//!
//! The release workflows change project versions and run the release
//! plugin through a [BuildTool]. [maven::MavenCommands] drives the real
//! `mvn`; [mock::MockBuildTool] records the equivalent command lines.

pub mod maven;
pub mod mock;

pub use maven::MavenCommands;
pub use mock::MockBuildTool;

use crate::error::Result;

/// Operations the release workflows need from the build system
pub trait BuildTool {
    /// Set the version of every module to `version` (a snapshot string)
    fn set_version(&self, version: &str) -> Result<()>;

    /// Commit the release version, tag it, and move to `development_version`
    fn release_prepare(&self, release_version: &str, development_version: &str, tag: &str)
        -> Result<()>;

    /// Remove the release plugin's working files
    fn release_clean(&self) -> Result<()>;
}

/// Goal and properties for `versions:set`
pub fn set_version_args(version: &str) -> Vec<String> {
    vec![
        "versions:set".to_string(),
        format!("-DnewVersion={}", version),
    ]
}

/// Goal and properties for `release:prepare`
pub fn release_prepare_args(
    release_version: &str,
    development_version: &str,
    tag: &str,
) -> Vec<String> {
    vec![
        "release:prepare".to_string(),
        format!("-DreleaseVersion={}", release_version),
        format!("-DdevelopmentVersion={}", development_version),
        format!("-Dtag={}", tag),
    ]
}

pub fn release_clean_args() -> Vec<String> {
    vec!["release:clean".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_prepare_args() {
        assert_eq!(
            release_prepare_args("0.231", "0.231.1-SNAPSHOT", "0.231"),
            vec![
                "release:prepare",
                "-DreleaseVersion=0.231",
                "-DdevelopmentVersion=0.231.1-SNAPSHOT",
                "-Dtag=0.231",
            ]
        );
    }
}
