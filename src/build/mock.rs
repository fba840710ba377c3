use crate::build::{release_clean_args, release_prepare_args, set_version_args, BuildTool};
use crate::command::{format_command, CommandLog};
use crate::error::{ReleaseError, Result};

/// Records the Maven command lines a release would run
#[derive(Debug, Default)]
pub struct MockBuildTool {
    log: CommandLog,
    failing_commands: Vec<String>,
}

impl MockBuildTool {
    pub fn new(log: CommandLog) -> Self {
        MockBuildTool {
            log,
            failing_commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.log.commands()
    }

    /// Fail every command whose rendering starts with `prefix`
    pub fn fail_on(&mut self, prefix: impl Into<String>) {
        self.failing_commands.push(prefix.into());
    }

    fn record(&self, arguments: Vec<String>) -> Result<()> {
        self.log.log("mvn", &arguments);
        let rendered = format_command("mvn", &arguments);
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

impl BuildTool for MockBuildTool {
    fn set_version(&self, version: &str) -> Result<()> {
        self.record(set_version_args(version))
    }

    fn release_prepare(
        &self,
        release_version: &str,
        development_version: &str,
        tag: &str,
    ) -> Result<()> {
        self.record(release_prepare_args(release_version, development_version, tag))
    }

    fn release_clean(&self) -> Result<()> {
        self.record(release_clean_args())
    }
}
