use crate::build::{release_clean_args, release_prepare_args, set_version_args, BuildTool};
use crate::command::CommandRunner;
use crate::config::MavenConfig;
use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Runs Maven goals in the project directory
pub struct MavenCommands {
    mvn: CommandRunner,
    options: Vec<String>,
}

impl MavenCommands {
    pub fn new(config: &MavenConfig, directory: &Path) -> Self {
        MavenCommands {
            mvn: CommandRunner::new(&config.executable, HashMap::new(), directory),
            options: config.options.clone(),
        }
    }

    /// Configured options come before the goal
    fn arguments(&self, goal: Vec<String>) -> Vec<String> {
        self.options.iter().cloned().chain(goal).collect()
    }

    fn run(&self, goal: Vec<String>) -> Result<()> {
        self.mvn.run(&self.arguments(goal)).map(|_| ())
    }
}

impl BuildTool for MavenCommands {
    fn set_version(&self, version: &str) -> Result<()> {
        info!("Setting project version to {}", version);
        self.run(set_version_args(version))
    }

    fn release_prepare(
        &self,
        release_version: &str,
        development_version: &str,
        tag: &str,
    ) -> Result<()> {
        info!(
            "Preparing release {} (next development version {})",
            release_version, development_version
        );
        self.run(release_prepare_args(release_version, development_version, tag))
    }

    fn release_clean(&self) -> Result<()> {
        self.run(release_clean_args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_precede_goal() {
        let config = MavenConfig {
            executable: "mvn".to_string(),
            options: vec!["-B".to_string(), "-DskipTests".to_string()],
        };
        let maven = MavenCommands::new(&config, Path::new("/tmp"));
        assert_eq!(
            maven.arguments(release_clean_args()),
            vec!["-B", "-DskipTests", "release:clean"]
        );
    }

    #[test]
    fn test_missing_executable_fails() {
        let config = MavenConfig {
            executable: "definitely-not-mvn-3b1d".to_string(),
            options: Vec::new(),
        };
        let maven = MavenCommands::new(&config, &std::env::temp_dir());
        assert!(maven.release_clean().unwrap_err().is_command_failure());
    }
}
