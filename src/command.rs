//! Synchronous execution of external tools (git, maven).
//!
//! Every invocation runs to completion before the caller continues. A
//! non-zero exit status becomes [`ReleaseError::CommandFailed`]; nothing is
//! retried.

use crate::error::{ReleaseError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Runs one executable inside a fixed working directory
#[derive(Debug, Clone)]
pub struct CommandRunner {
    executable: String,
    environment: HashMap<String, String>,
    directory: PathBuf,
}

impl CommandRunner {
    pub fn new(
        executable: impl Into<String>,
        environment: HashMap<String, String>,
        directory: impl Into<PathBuf>,
    ) -> Self {
        CommandRunner {
            executable: executable.into(),
            environment,
            directory: directory.into(),
        }
    }

    /// Run the executable with `arguments` and return its standard output
    pub fn run<S: AsRef<str>>(&self, arguments: &[S]) -> Result<String> {
        let rendered = format_command(&self.executable, arguments);
        debug!(command = %rendered, directory = %self.directory.display(), "running");

        let mut cmd = Command::new(&self.executable);
        cmd.current_dir(&self.directory);
        cmd.args(arguments.iter().map(|a| a.as_ref()));
        for (key, value) in &self.environment {
            cmd.env(key, value);
        }

        let output = cmd.output().map_err(|e| ReleaseError::CommandFailed {
            command: rendered.clone(),
            status: -1,
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(ReleaseError::CommandFailed {
                command: rendered,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Render a command line; arguments containing whitespace are double-quoted
pub fn format_command<S: AsRef<str>>(executable: &str, arguments: &[S]) -> String {
    let mut rendered = executable.to_string();
    for argument in arguments {
        let argument = argument.as_ref();
        rendered.push(' ');
        if argument.chars().any(char::is_whitespace) {
            rendered.push('"');
            rendered.push_str(argument);
            rendered.push('"');
        } else {
            rendered.push_str(argument);
        }
    }
    rendered
}

/// Split command output into trimmed, non-empty lines
pub fn output_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared, ordered record of the commands issued by test doubles
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Arc<Mutex<Vec<String>>>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log<S: AsRef<str>>(&self, executable: &str, arguments: &[S]) {
        let rendered = format_command(executable, arguments);
        debug!(command = %rendered, "recorded");
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(rendered);
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_command_quotes_whitespace() {
        let rendered = format_command(
            "git",
            &["commit", "-m", "Prepare for next development iteration - 0.233-SNAPSHOT"],
        );
        assert_eq!(
            rendered,
            "git commit -m \"Prepare for next development iteration - 0.233-SNAPSHOT\""
        );
    }

    #[test]
    fn test_output_lines() {
        assert_eq!(
            output_lines("0.230\n\n  0.231 \n"),
            vec!["0.230".to_string(), "0.231".to_string()]
        );
        assert!(output_lines("").is_empty());
    }

    #[test]
    fn test_command_log_is_shared() {
        let log = CommandLog::new();
        let clone = log.clone();
        log.log("git", &["status", "-s"]);
        clone.log("mvn", &["release:clean"]);
        assert_eq!(log.commands(), vec!["git status -s", "mvn release:clean"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_runner_returns_stdout() {
        let dir = std::env::temp_dir();
        let runner = CommandRunner::new("echo", HashMap::new(), dir);
        assert_eq!(runner.run(&["hello"]).unwrap().trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_runner_reports_failure() {
        let runner = CommandRunner::new("false", HashMap::new(), std::env::temp_dir());
        let err = runner.run::<&str>(&[]).unwrap_err();
        assert!(err.is_command_failure());
    }

    #[test]
    fn test_missing_executable_is_command_failure() {
        let runner = CommandRunner::new(
            "definitely-not-a-real-executable-7c1e",
            HashMap::new(),
            std::env::temp_dir(),
        );
        assert!(runner.run(&["--version"]).unwrap_err().is_command_failure());
    }
}
